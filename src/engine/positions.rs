/// Позиции раунда – индексы в порядке рассадки участников раунда.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlindPositions {
    pub dealer: usize,
    pub small_blind: usize,
    pub big_blind: usize,
    pub first_to_act: usize,
}

/// Дилер = `dealer_turn % n`, дальше по кругу SB, BB и первый ходящий.
///
/// Для двоих BB совпадает с дилером, а первым ходит SB.
pub fn blind_positions(dealer_turn: usize, n: usize) -> BlindPositions {
    assert!(n >= 2, "blind_positions: нужно минимум 2 участника");
    let dealer = dealer_turn % n;
    BlindPositions {
        dealer,
        small_blind: (dealer + 1) % n,
        big_blind: (dealer + 2) % n,
        first_to_act: (dealer + 3) % n,
    }
}

/// Следующая позиция по кругу.
pub fn next_position(pos: usize, n: usize) -> usize {
    (pos + 1) % n
}

/// Следующая (после `pos`, по кругу) позиция, удовлетворяющая `pred`.
/// Сама `pos` проверяется последней.
pub fn next_position_where<F>(pos: usize, n: usize, pred: F) -> Option<usize>
where
    F: Fn(usize) -> bool,
{
    (1..=n).map(|step| (pos + step) % n).find(|&idx| pred(idx))
}
