use memory_game_core::{
    slot_rects, BoardLayout, CardSlot, GridSize, Point, Rect, SymbolKey, SymbolPool,
};
use rand::{
    seq::{index, SliceRandom},
    Rng,
};

use crate::EngineError;

/// Single card dealt onto the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    symbol: SymbolKey,
    slot: CardSlot,
    area: Rect,
    flipped: bool,
    matched: bool,
}

impl Card {
    /// Symbol shared with exactly one other card of the same pair.
    #[must_use]
    pub fn symbol(&self) -> &SymbolKey {
        &self.symbol
    }

    /// Slot the card occupies.
    #[must_use]
    pub const fn slot(&self) -> CardSlot {
        self.slot
    }

    /// Area used for hit-testing.
    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Whether the card currently shows its face.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Whether the card has been paired with its twin.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.matched
    }
}

/// Cards of one round in row-major slot order.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    grid: GridSize,
    cards: Vec<Card>,
}

impl Board {
    /// Deals a freshly shuffled board for `grid`.
    ///
    /// When the pool holds enough symbols every pair gets a distinct one.
    /// Larger grids use each symbol once and fill the remaining pairs with
    /// symbols drawn independently from the pool.
    pub fn generate<R>(
        grid: GridSize,
        pool: &SymbolPool,
        layout: &BoardLayout,
        rng: &mut R,
    ) -> Result<Self, EngineError>
    where
        R: Rng + ?Sized,
    {
        if !grid.is_pairable() {
            return Err(EngineError::InvalidLevel {
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }

        let pair_count = grid.pair_count() as usize;
        let mut symbols: Vec<SymbolKey> = choose_symbols(pair_count, pool, rng)
            .into_iter()
            .flat_map(|symbol| [symbol.clone(), symbol])
            .collect();
        symbols.shuffle(rng);

        let cards = symbols
            .into_iter()
            .zip(slot_rects(grid, layout))
            .zip(0_u32..)
            .map(|((symbol, area), slot)| Card {
                symbol,
                slot: CardSlot::new(slot),
                area,
                flipped: false,
                matched: false,
            })
            .collect();

        Ok(Self { grid, cards })
    }

    /// Board dimensions.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Cards in slot order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card occupying `slot`, if any.
    #[must_use]
    pub fn card(&self, slot: CardSlot) -> Option<&Card> {
        self.cards.get(slot.index())
    }

    /// First unmatched card whose area contains `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&Card> {
        self.cards
            .iter()
            .find(|card| !card.matched && card.area.contains(point))
    }

    /// Reports whether every card has been matched.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|card| card.matched)
    }

    /// Number of pairs that have been matched so far.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|card| card.matched).count() / 2
    }

    pub(crate) fn flip(&mut self, slot: CardSlot) {
        if let Some(card) = self.cards.get_mut(slot.index()) {
            card.flipped = true;
        }
    }

    pub(crate) fn hide(&mut self, slot: CardSlot) {
        if let Some(card) = self.cards.get_mut(slot.index()) {
            if !card.matched {
                card.flipped = false;
            }
        }
    }

    pub(crate) fn mark_matched(&mut self, slot: CardSlot) {
        if let Some(card) = self.cards.get_mut(slot.index()) {
            card.flipped = true;
            card.matched = true;
        }
    }
}

fn choose_symbols<R>(pair_count: usize, pool: &SymbolPool, rng: &mut R) -> Vec<SymbolKey>
where
    R: Rng + ?Sized,
{
    let symbols = pool.as_slice();
    if pair_count <= symbols.len() {
        return index::sample(rng, symbols.len(), pair_count)
            .into_iter()
            .map(|index| symbols[index].clone())
            .collect();
    }

    let mut chosen = symbols.to_vec();
    for _ in symbols.len()..pair_count {
        if let Some(symbol) = symbols.choose(rng) {
            chosen.push(symbol.clone());
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::EngineError;
    use memory_game_core::{BoardLayout, GridSize, Point, SymbolKey, SymbolPool};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{BTreeMap, HashSet};

    fn generate(grid: GridSize, pool: &SymbolPool, seed: u64) -> Board {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Board::generate(grid, pool, &BoardLayout::default(), &mut rng).expect("valid grid")
    }

    fn symbol_counts(board: &Board) -> BTreeMap<SymbolKey, usize> {
        let mut counts = BTreeMap::new();
        for card in board.cards() {
            *counts.entry(card.symbol().clone()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn small_boards_use_distinct_symbols() {
        let board = generate(GridSize::new(4, 4), &SymbolPool::standard(), 7);
        let counts = symbol_counts(&board);

        assert_eq!(board.cards().len(), 16);
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|count| *count == 2));
    }

    #[test]
    fn large_boards_use_every_symbol_and_keep_counts_even() {
        let pool = SymbolPool::standard();
        for edge in [6, 8, 10, 12] {
            let grid = GridSize::new(edge, edge);
            let board = generate(grid, &pool, u64::from(edge));
            let counts = symbol_counts(&board);

            assert_eq!(board.cards().len(), grid.cell_count() as usize);
            assert_eq!(counts.len(), pool.len());
            assert!(counts.values().all(|count| count % 2 == 0));
            assert_eq!(counts.values().sum::<usize>() / 2, grid.pair_count() as usize);
        }
    }

    #[test]
    fn odd_grids_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = Board::generate(
            GridSize::new(3, 3),
            &SymbolPool::standard(),
            &BoardLayout::default(),
            &mut rng,
        );

        assert_eq!(
            result,
            Err(EngineError::InvalidLevel {
                columns: 3,
                rows: 3
            })
        );
    }

    #[test]
    fn shuffles_differ_between_seeds_but_keep_the_multiset() {
        let pool = SymbolPool::standard();
        let grid = GridSize::new(8, 8);
        let orders: HashSet<Vec<SymbolKey>> = (0..8)
            .map(|seed| {
                generate(grid, &pool, seed)
                    .cards()
                    .iter()
                    .map(|card| card.symbol().clone())
                    .collect()
            })
            .collect();

        assert!(orders.len() > 1);
        let first = generate(grid, &pool, 1);
        let again = generate(grid, &pool, 1);
        assert_eq!(first, again);
    }

    #[test]
    fn slots_follow_row_major_order() {
        let board = generate(GridSize::new(2, 2), &SymbolPool::standard(), 3);

        for (index, card) in board.cards().iter().enumerate() {
            assert_eq!(card.slot().index(), index);
            assert!(!card.is_flipped());
            assert!(!card.is_matched());
        }
    }

    #[test]
    fn hit_test_skips_matched_cards_and_gaps() {
        let mut board = generate(GridSize::new(2, 2), &SymbolPool::standard(), 11);
        let first = board.cards()[0].clone();
        let center = first.area().center();

        assert_eq!(board.hit_test(center).map(|card| card.slot()), Some(first.slot()));
        assert!(board.hit_test(Point::new(-5.0, -5.0)).is_none());
        assert!(board.hit_test(Point::new(109.0, 50.0)).is_none());

        board.mark_matched(first.slot());
        assert!(board.hit_test(center).is_none());
    }

    #[test]
    fn hidden_matched_cards_stay_face_up() {
        let mut board = generate(GridSize::new(2, 2), &SymbolPool::standard(), 5);
        let slot = board.cards()[1].slot();

        board.mark_matched(slot);
        board.hide(slot);

        let card = board.card(slot).expect("card");
        assert!(card.is_flipped());
        assert!(card.is_matched());
    }
}
