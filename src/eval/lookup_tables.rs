use crate::domain::card::{Card, Rank};

/// Битовая маска рангов.
///
/// Используем 13 бит (от 2 до A):
/// бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Все возможные стриты (5 подряд) вместе со старшей картой,
/// от сильнейшего (broadway) к слабейшему (wheel).
///
/// У wheel (A2345) старшая карта – пятёрка: туз играет снизу.
pub const STRAIGHT_MASKS: [(Rank, RankMask); 10] = [
    (Rank::Ace, mask_from_ranks(&[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace])),
    (Rank::King, mask_from_ranks(&[Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King])),
    (Rank::Queen, mask_from_ranks(&[Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen])),
    (Rank::Jack, mask_from_ranks(&[Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack])),
    (Rank::Ten, mask_from_ranks(&[Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten])),
    (Rank::Nine, mask_from_ranks(&[Rank::Five, Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine])),
    (Rank::Eight, mask_from_ranks(&[Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight])),
    (Rank::Seven, mask_from_ranks(&[Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven])),
    (Rank::Six, mask_from_ranks(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six])),
    (Rank::Five, mask_from_ranks(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five])),
];

/// Получить битовую маску для одного ранга.
pub fn rank_to_bit(rank: Rank) -> RankMask {
    let idx = rank.value().saturating_sub(2); // Rank::Two = 2
    1u16 << idx
}

/// Построить маску из списка рангов.
pub const fn mask_from_ranks(ranks: &[Rank]) -> RankMask {
    let mut mask: RankMask = 0;
    let mut i = 0;
    while i < ranks.len() {
        let r = ranks[i] as u8;
        let idx = r.saturating_sub(2);
        mask |= 1 << idx;
        i += 1;
    }
    mask
}

/// Маска рангов набора карт (дубли рангов схлопываются).
pub fn mask_of(cards: &[Card]) -> RankMask {
    cards.iter().fold(0, |acc, c| acc | rank_to_bit(c.rank))
}

/// Найти старший стрит в маске. Возвращает старшую карту стрита.
///
/// Особый случай: wheel (A2345) → `Rank::Five`.
pub fn detect_straight(rank_mask: RankMask) -> Option<Rank> {
    STRAIGHT_MASKS
        .iter()
        .find(|(_, sm)| rank_mask & sm == *sm)
        .map(|(high, _)| *high)
}

/// Ранги стрита от старшего к младшему.
pub fn straight_ranks(high: Rank) -> [Rank; 5] {
    if high == Rank::Five {
        return [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    }
    let top = high.value().max(Rank::Six.value()) as usize - 2;
    [
        Rank::ALL[top],
        Rank::ALL[top - 1],
        Rank::ALL[top - 2],
        Rank::ALL[top - 3],
        Rank::ALL[top - 4],
    ]
}
