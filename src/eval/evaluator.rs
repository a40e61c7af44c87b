use crate::domain::card::{Card, Rank, Suit};

use super::hand_rank::{EvaluatedHand, HandCategory};
use super::lookup_tables::{detect_straight, mask_of, straight_ranks};

/// Главная функция: лучшая рука из карманных карт + борда (до 7 карт).
///
/// Категории проверяются от сильной к слабой, первое совпадение – лучшее.
/// Работает и для неполного набора (2 карты на префлопе).
pub fn evaluate_best_hand(cards: &[Card]) -> EvaluatedHand {
    assert!(!cards.is_empty(), "evaluate_best_hand: пустой набор карт");

    let mut sorted = cards.to_vec();
    // Ранг по убыванию, при равном ранге – старшая масть первой.
    sorted.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| b.suit.cmp(&a.suit)));

    let counts = rank_counts(&sorted);

    if let Some(hand) = straight_flush(&sorted) {
        return hand;
    }

    if let Some(quad) = highest_with_count(&counts, 4) {
        return by_ranks(&sorted, HandCategory::FourOfAKind, &[(quad, 4)]);
    }

    if let Some(trips) = highest_with_count(&counts, 3) {
        let pair = Rank::ALL
            .iter()
            .rev()
            .copied()
            .find(|r| *r != trips && counts[r.value() as usize] >= 2);
        if let Some(pair) = pair {
            return by_ranks(&sorted, HandCategory::FullHouse, &[(trips, 3), (pair, 2)]);
        }
    }

    if let Some(hand) = flush(&sorted) {
        return hand;
    }

    if let Some(high) = detect_straight(mask_of(&sorted)) {
        let mut used = Vec::with_capacity(5);
        for rank in straight_ranks(high) {
            // Среди дублей ранга берём старшую масть (первую в sorted).
            if let Some(card) = sorted.iter().find(|c| c.rank == rank) {
                used.push(*card);
            }
        }
        return assemble(&sorted, HandCategory::Straight, used);
    }

    if let Some(trips) = highest_with_count(&counts, 3) {
        return by_ranks(&sorted, HandCategory::ThreeOfAKind, &[(trips, 3)]);
    }

    let pairs: Vec<Rank> = Rank::ALL
        .iter()
        .rev()
        .copied()
        .filter(|r| counts[r.value() as usize] == 2)
        .collect();

    if pairs.len() >= 2 {
        return by_ranks(
            &sorted,
            HandCategory::TwoPair,
            &[(pairs[0], 2), (pairs[1], 2)],
        );
    }

    if let Some(pair) = pairs.first() {
        return by_ranks(&sorted, HandCategory::OnePair, &[(*pair, 2)]);
    }

    // High card: кикеры – все карты по убыванию.
    let top = sorted[0];
    EvaluatedHand {
        category: HandCategory::HighCard,
        cards: vec![top],
        primary: top,
        secondary: None,
        kickers: sorted,
    }
}

/// Количество карт каждого ранга, индекс = значение ранга (2..=14).
fn rank_counts(cards: &[Card]) -> [u8; 15] {
    let mut counts = [0u8; 15];
    for card in cards {
        counts[card.value() as usize] += 1;
    }
    counts
}

fn highest_with_count(counts: &[u8; 15], n: u8) -> Option<Rank> {
    Rank::ALL
        .iter()
        .rev()
        .copied()
        .find(|r| counts[r.value() as usize] >= n)
}

/// Карты масти, у которой их хотя бы 5 (в 7 картах такая одна).
fn flush_group(sorted: &[Card]) -> Option<Vec<Card>> {
    Suit::ALL.iter().find_map(|suit| {
        let group: Vec<Card> = sorted.iter().filter(|c| c.suit == *suit).copied().collect();
        (group.len() >= 5).then_some(group)
    })
}

fn straight_flush(sorted: &[Card]) -> Option<EvaluatedHand> {
    let group = flush_group(sorted)?;
    let high = detect_straight(mask_of(&group))?;

    let used: Vec<Card> = straight_ranks(high)
        .iter()
        .filter_map(|rank| group.iter().find(|c| c.rank == *rank).copied())
        .collect();

    let category = if high == Rank::Ace {
        HandCategory::RoyalStraightFlush
    } else {
        HandCategory::StraightFlush
    };
    Some(assemble(sorted, category, used))
}

/// Флеш: 5 старших карт масти. Кикеры – остальные карты флеша,
/// затем всё прочее, иначе два флеша с одной старшей картой не различить.
fn flush(sorted: &[Card]) -> Option<EvaluatedHand> {
    let group = flush_group(sorted)?;
    let used: Vec<Card> = group.into_iter().take(5).collect();
    let primary = used[0];

    let mut kickers: Vec<Card> = used[1..].to_vec();
    kickers.extend(sorted.iter().filter(|c| !used.contains(c)).copied());

    Some(EvaluatedHand {
        category: HandCategory::Flush,
        cards: used,
        primary,
        secondary: None,
        kickers,
    })
}

/// Собрать руку по группам одного ранга: [(ранг, сколько карт)].
/// Первые карты групп становятся primary / secondary.
fn by_ranks(sorted: &[Card], category: HandCategory, groups: &[(Rank, usize)]) -> EvaluatedHand {
    let mut used = Vec::with_capacity(5);
    for (rank, take) in groups {
        used.extend(sorted.iter().filter(|c| c.rank == *rank).take(*take).copied());
    }

    let primary = used[0];
    let secondary = groups
        .get(1)
        .and_then(|(rank, _)| used.iter().find(|c| c.rank == *rank).copied());

    let kickers = sorted.iter().filter(|c| !used.contains(c)).copied().collect();

    EvaluatedHand {
        category,
        cards: used,
        primary,
        secondary,
        kickers,
    }
}

/// Стрит и стрит-флеш: главная карта – старшая карта стрита (у wheel – пятёрка).
fn assemble(sorted: &[Card], category: HandCategory, used: Vec<Card>) -> EvaluatedHand {
    let primary = used[0];
    let kickers = sorted.iter().filter(|c| !used.contains(c)).copied().collect();
    EvaluatedHand {
        category,
        cards: used,
        primary,
        secondary: None,
        kickers,
    }
}
