//! This module contains the difficulty model: structural metrics computed
//! over a puzzle board, the data-driven scoring configuration that combines
//! them into a difficulty score, and the [TierRegistry] in which named
//! difficulty tiers are looked up by the [assembly](crate::assembly) module.
//!
//! A [Tier] is plain data. All behavioral variation between tiers is
//! expressed through the [ClueScale], [StructureBonus], and [RetryRule]
//! enumerations, so new tiers can be registered without writing code.

use crate::SudokuGrid;

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

fn is_filled(grid: &SudokuGrid, column: usize, row: usize) -> bool {
    grid.cells()[crate::index(column, row, grid.size())].is_some()
}

fn block_of(grid: &SudokuGrid, column: usize, row: usize) -> usize {
    (row / grid.block_height()) * grid.block_height()
        + column / grid.block_width()
}

/// Computes the fraction of cells which agree with their 180°-rotational
/// counterpart on being filled or blank. A fully symmetric clue pattern
/// scores 1.0. Human-made puzzles tend to be symmetric, so a low score hints
/// at a harder, machine-carved look.
pub fn symmetry_score(grid: &SudokuGrid) -> f64 {
    let size = grid.size();
    let mut matching = 0;

    for row in 0..size {
        for column in 0..size {
            let here = is_filled(grid, column, row);
            let there = is_filled(grid, size - 1 - column, size - 1 - row);

            if here == there {
                matching += 1;
            }
        }
    }

    matching as f64 / (size * size) as f64
}

/// Computes how evenly the clues are spread over the blocks of the grid, as
/// `1 / (1 + variance)` of the per-block clue counts. An even spread scores
/// close to 1.0, a lopsided one close to 0.
pub fn region_distribution(grid: &SudokuGrid) -> f64 {
    let size = grid.size();
    let mut block_clues = vec![0usize; size];

    for row in 0..size {
        for column in 0..size {
            if is_filled(grid, column, row) {
                block_clues[block_of(grid, column, row)] += 1;
            }
        }
    }

    let mean = block_clues.iter().sum::<usize>() as f64 / size as f64;
    let variance = block_clues.iter()
        .map(|&count| {
            let deviation = count as f64 - mean;
            deviation * deviation
        })
        .sum::<f64>() / size as f64;

    1.0 / (1.0 + variance)
}

/// Counts the clues in the block containing the center cell of the grid.
pub fn center_block_clues(grid: &SudokuGrid) -> usize {
    let size = grid.size();
    let center_block = block_of(grid, size / 2, size / 2);
    let mut clues = 0;

    for row in 0..size {
        for column in 0..size {
            if block_of(grid, column, row) == center_block &&
                    is_filled(grid, column, row) {
                clues += 1;
            }
        }
    }

    clues
}

/// Counts the clues that are isolated, i.e. whose 3x3 neighborhood (the cell
/// itself included) contains at most 2 filled cells. Isolated clues give the
/// solver less to chain from, so many of them indicate a hard puzzle.
pub fn isolated_clues(grid: &SudokuGrid) -> usize {
    let size = grid.size() as isize;
    let mut isolated = 0;

    for row in 0..size {
        for column in 0..size {
            if !is_filled(grid, column as usize, row as usize) {
                continue;
            }

            let mut filled_neighbors = 0;

            for neighbor_row in (row - 1)..=(row + 1) {
                for neighbor_column in (column - 1)..=(column + 1) {
                    if neighbor_row < 0 || neighbor_row >= size ||
                            neighbor_column < 0 || neighbor_column >= size {
                        continue;
                    }

                    if is_filled(grid, neighbor_column as usize,
                            neighbor_row as usize) {
                        filled_neighbors += 1;
                    }
                }
            }

            if filled_neighbors <= 2 {
                isolated += 1;
            }
        }
    }

    isolated
}

/// How the clue count of a board is converted into the clue component of a
/// difficulty score.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum ClueScale {

    /// The component is `clue_count / reference`, clamped to `[0, 1]`. Used
    /// by tiers in which more clues mean a higher (more advanced within the
    /// tier band) score.
    Filled(f64),

    /// The component is `1 - clue_count / reference`, so fewer clues mean a
    /// higher score.
    Missing(f64)
}

impl ClueScale {
    fn component(self, clue_count: usize) -> f64 {
        match self {
            ClueScale::Filled(reference) =>
                (clue_count as f64 / reference).clamp(0.0, 1.0),
            ClueScale::Missing(reference) =>
                1.0 - clue_count as f64 / reference
        }
    }
}

/// The relative weights of the metric components in a difficulty score.
/// Metrics with a weight of zero are not computed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScoreWeights {

    /// The weight of the [ClueScale] component.
    pub clues: f64,

    /// The weight of the [symmetry_score] metric.
    pub symmetry: f64,

    /// The weight of the [region_distribution] metric.
    pub distribution: f64
}

/// An additive bonus derived from the structure of the clue pattern, applied
/// on top of the weighted metric components.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum StructureBonus {

    /// No bonus is applied.
    None,

    /// Rewards a sparse center block (less than 3 clues) with 0.1 and an
    /// asymmetric pattern (symmetry below 0.7) with 0.05, capped at 0.15.
    CenterIsolation,

    /// Rewards isolated clues: `weight * clamp(0.2 + clamp(isolated / 15,
    /// 0, 0.3), 0, 1)`.
    IsolationPatterns {

        /// The factor the isolation term is multiplied with.
        weight: f64
    }
}

impl StructureBonus {
    fn value(self, grid: &SudokuGrid) -> f64 {
        match self {
            StructureBonus::None => 0.0,
            StructureBonus::CenterIsolation => {
                let mut bonus: f64 = 0.0;

                if center_block_clues(grid) < 3 {
                    bonus += 0.1;
                }

                if symmetry_score(grid) < 0.7 {
                    bonus += 0.05;
                }

                bonus.clamp(0.0, 0.15)
            },
            StructureBonus::IsolationPatterns { weight } => {
                let isolation =
                    (isolated_clues(grid) as f64 / 15.0).clamp(0.0, 0.3);
                weight * (0.2 + isolation).clamp(0.0, 1.0)
            }
        }
    }
}

/// The full scoring configuration of a difficulty tier. The score of a board
/// is `base + span * (weighted components + bonus)`, clamped to `[0, 1]`, so
/// `base` is the bottom of the tier's score band and `base + span` roughly
/// its top.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scoring {

    /// How the clue count enters the score.
    pub clue_scale: ClueScale,

    /// The weights of the metric components.
    pub weights: ScoreWeights,

    /// The structural bonus applied on top of the weighted components.
    pub bonus: StructureBonus,

    /// The bottom of the tier's score band.
    pub base: f64,

    /// The width of the tier's score band.
    pub span: f64
}

impl Scoring {

    /// Computes the difficulty score of the given board under this
    /// configuration. The result lies in `[0, 1]`.
    pub fn score(&self, grid: &SudokuGrid) -> f64 {
        let clue_count = grid.count_clues();
        let mut combined =
            self.weights.clues * self.clue_scale.component(clue_count);

        if self.weights.symmetry != 0.0 {
            combined += self.weights.symmetry * symmetry_score(grid);
        }

        if self.weights.distribution != 0.0 {
            combined += self.weights.distribution * region_distribution(grid);
        }

        combined += self.bonus.value(grid);

        (self.base + self.span * combined).clamp(0.0, 1.0)
    }
}

/// Decides whether the assembly loop should carve another candidate after
/// inspecting the current one.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum RetryRule {

    /// Always retries until the given number of attempts has been made.
    Attempts {

        /// The maximum number of attempts.
        cap: usize
    },

    /// Retries while the candidate has fewer clues than the tier's minimum,
    /// up to the given number of attempts. Used by tiers that are mainly in
    /// danger of coming out too hard.
    BelowMinClues {

        /// The maximum number of attempts.
        cap: usize
    },

    /// Retries while the candidate's clue count lies outside the tier's clue
    /// band, up to the given number of attempts.
    OutsideClueBand {

        /// The maximum number of attempts.
        cap: usize
    }
}

impl RetryRule {
    fn should_retry(self, attempts: usize, clue_count: usize,
            min_clues: usize, max_clues: usize) -> bool {
        match self {
            RetryRule::Attempts { cap } => attempts < cap,
            RetryRule::BelowMinClues { cap } =>
                attempts < cap && clue_count < min_clues,
            RetryRule::OutsideClueBand { cap } =>
                attempts < cap &&
                    (clue_count < min_clues || clue_count > max_clues)
        }
    }
}

/// A named difficulty tier: a clue band, a scoring configuration, and a
/// retry rule. Tiers are plain data and are registered in a [TierRegistry].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Tier {
    name: String,
    min_clues: usize,
    max_clues: usize,
    scoring: Scoring,
    retry: RetryRule
}

impl Tier {

    /// Creates a new tier from its parts.
    ///
    /// # Arguments
    ///
    /// * `name`: The display name of the tier. Registry lookup is
    /// case-insensitive, but this name is stored as given.
    /// * `min_clues`: The lowest acceptable clue count of a puzzle in this
    /// tier.
    /// * `max_clues`: The highest acceptable clue count of a puzzle in this
    /// tier.
    /// * `scoring`: The scoring configuration of this tier.
    /// * `retry`: The retry rule the assembly loop applies for this tier.
    pub fn new(name: impl Into<String>, min_clues: usize, max_clues: usize,
            scoring: Scoring, retry: RetryRule) -> Tier {
        Tier {
            name: name.into(),
            min_clues,
            max_clues,
            scoring,
            retry
        }
    }

    /// The display name of this tier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowest acceptable clue count of a puzzle in this tier.
    pub fn min_clues(&self) -> usize {
        self.min_clues
    }

    /// The highest acceptable clue count of a puzzle in this tier.
    pub fn max_clues(&self) -> usize {
        self.max_clues
    }

    /// The fraction of cells the generator should remove so that the carved
    /// board lands in the middle of this tier's clue band, for a grid with
    /// the given total cell count.
    pub fn nominal_difficulty(&self, cell_count: usize) -> f64 {
        let mid_clues = (self.min_clues + self.max_clues) as f64 / 2.0;
        1.0 - mid_clues / cell_count as f64
    }

    /// Computes the difficulty score of the given board under this tier's
    /// scoring configuration.
    pub fn score(&self, grid: &SudokuGrid) -> f64 {
        self.scoring.score(grid)
    }

    /// The center of this tier's score band, which assembly candidates are
    /// compared against.
    pub fn target_score(&self) -> f64 {
        self.scoring.base + self.scoring.span / 2.0
    }

    /// Indicates whether the assembly loop should carve another candidate,
    /// given the number of attempts made so far and the clue count of the
    /// best candidate found.
    pub fn should_retry(&self, attempts: usize, clue_count: usize) -> bool {
        self.retry.should_retry(attempts, clue_count, self.min_clues,
            self.max_clues)
    }
}

/// A registry of difficulty [Tier]s, keyed by lowercased tier name. The
/// registry is an owned value; distinct assemblers can hold distinct, even
/// conflicting, tier configurations.
#[derive(Clone, Debug, Default)]
pub struct TierRegistry {
    tiers: BTreeMap<String, Tier>
}

impl TierRegistry {

    /// Creates a registry that contains no tiers.
    pub fn empty() -> TierRegistry {
        TierRegistry {
            tiers: BTreeMap::new()
        }
    }

    /// Creates a registry with the four standard tiers for ordinary 9x9
    /// grids: "beginner" (40 to 50 clues), "intermediate" (30 to 40),
    /// "advanced" (25 to 32), and "expert" (17 to 25).
    pub fn standard() -> TierRegistry {
        let mut registry = TierRegistry::empty();

        registry.register(Tier::new("beginner", 40, 50,
            Scoring {
                clue_scale: ClueScale::Filled(45.0),
                weights: ScoreWeights {
                    clues: 1.0,
                    symmetry: 0.0,
                    distribution: 0.0
                },
                bonus: StructureBonus::None,
                base: 0.3,
                span: 0.3
            },
            RetryRule::BelowMinClues { cap: 15 }));
        registry.register(Tier::new("intermediate", 30, 40,
            Scoring {
                clue_scale: ClueScale::Missing(50.0),
                weights: ScoreWeights {
                    clues: 0.6,
                    symmetry: 0.2,
                    distribution: 0.2
                },
                bonus: StructureBonus::None,
                base: 0.5,
                span: 0.25
            },
            RetryRule::OutsideClueBand { cap: 12 }));
        registry.register(Tier::new("advanced", 25, 32,
            Scoring {
                clue_scale: ClueScale::Missing(35.0),
                weights: ScoreWeights {
                    clues: 0.5,
                    symmetry: 0.3,
                    distribution: 0.2
                },
                bonus: StructureBonus::CenterIsolation,
                base: 0.65,
                span: 0.2
            },
            RetryRule::OutsideClueBand { cap: 20 }));
        registry.register(Tier::new("expert", 17, 25,
            Scoring {
                clue_scale: ClueScale::Missing(30.0),
                weights: ScoreWeights {
                    clues: 0.3,
                    symmetry: 0.2,
                    distribution: 0.2
                },
                bonus: StructureBonus::IsolationPatterns {
                    weight: 0.3
                },
                base: 0.75,
                span: 0.25
            },
            RetryRule::OutsideClueBand { cap: 25 }));

        registry
    }

    /// Registers the given tier, replacing any previously registered tier
    /// whose name matches case-insensitively.
    pub fn register(&mut self, tier: Tier) {
        self.tiers.insert(tier.name().to_lowercase(), tier);
    }

    /// Looks up a tier by name, ignoring case. Returns `None` if no tier
    /// with that name is registered.
    pub fn get(&self, name: &str) -> Option<&Tier> {
        self.tiers.get(&name.to_lowercase())
    }

    /// An iterator over the names of the registered tiers, in lexicographic
    /// order of their lowercased form.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.values().map(Tier::name)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn grid_with_clues(clues: &[(usize, usize)]) -> SudokuGrid {
        let mut grid = SudokuGrid::new(3, 3).unwrap();

        for &(column, row) in clues {
            grid.set_cell(column, row, 1).unwrap();
        }

        grid
    }

    #[test]
    fn empty_grid_is_perfectly_symmetric() {
        let grid = SudokuGrid::new(3, 3).unwrap();

        assert_eq!(1.0, symmetry_score(&grid));
    }

    #[test]
    fn lone_clue_breaks_symmetry_at_two_cells() {
        let grid = grid_with_clues(&[(0, 0)]);

        assert!((symmetry_score(&grid) - 79.0 / 81.0).abs() < 1e-9);
    }

    #[test]
    fn rotationally_matched_clues_are_symmetric() {
        let grid = grid_with_clues(&[(0, 0), (8, 8), (2, 3), (6, 5)]);

        assert_eq!(1.0, symmetry_score(&grid));
    }

    #[test]
    fn even_spread_scores_higher_than_lopsided() {
        // 9 clues evenly over the blocks versus 9 clues in one block
        let even = grid_with_clues(&[(0, 0), (3, 0), (6, 0), (0, 3), (3, 3),
            (6, 3), (0, 6), (3, 6), (6, 6)]);
        let lopsided = grid_with_clues(&[(0, 0), (1, 0), (2, 0), (0, 1),
            (1, 1), (2, 1), (0, 2), (1, 2), (2, 2)]);

        assert_eq!(1.0, region_distribution(&even));
        assert!(region_distribution(&even) > region_distribution(&lopsided));
    }

    #[test]
    fn center_block_clues_only_counts_the_middle_block() {
        let grid = grid_with_clues(&[(4, 4), (3, 5), (0, 0), (8, 8), (4, 2)]);

        assert_eq!(2, center_block_clues(&grid));
    }

    #[test]
    fn lone_clues_are_isolated_and_clusters_are_not() {
        let lone = grid_with_clues(&[(0, 0), (4, 4), (8, 0)]);
        let cluster = grid_with_clues(&[(3, 3), (4, 3), (3, 4), (4, 4)]);

        assert_eq!(3, isolated_clues(&lone));
        assert_eq!(0, isolated_clues(&cluster));
    }

    #[test]
    fn clue_pairs_still_count_as_isolated() {
        let grid = grid_with_clues(&[(2, 2), (3, 2)]);

        assert_eq!(2, isolated_clues(&grid));
    }

    #[test]
    fn center_isolation_bonus_rewards_sparse_asymmetric_centers() {
        // 13 clues in the top two rows: the center block is empty and no
        // clue has a rotational partner, so symmetry is 55/81 < 0.7 and
        // both bonus conditions fire.
        let grid = grid_with_clues(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0),
            (5, 0), (6, 0), (7, 0), (8, 0), (0, 1), (1, 1), (2, 1), (3, 1)]);
        let weights = ScoreWeights {
            clues: 0.0,
            symmetry: 0.0,
            distribution: 0.0
        };
        let with_bonus = Scoring {
            clue_scale: ClueScale::Filled(45.0),
            weights,
            bonus: StructureBonus::CenterIsolation,
            base: 0.0,
            span: 1.0
        };
        let without_bonus = Scoring {
            bonus: StructureBonus::None,
            ..with_bonus
        };

        assert!((with_bonus.score(&grid) - 0.15).abs() < 1e-9);
        assert_eq!(0.0, without_bonus.score(&grid));
    }

    #[test]
    fn filled_clue_scale_is_clamped() {
        assert_eq!(1.0, ClueScale::Filled(45.0).component(60));
        assert!((ClueScale::Filled(45.0).component(30) - 30.0 / 45.0).abs()
            < 1e-9);
    }

    #[test]
    fn missing_clue_scale_rises_as_clues_drop() {
        let scale = ClueScale::Missing(50.0);

        assert!(scale.component(25) > scale.component(40));
    }

    #[test]
    fn beginner_scores_lie_in_the_lower_band() {
        let registry = TierRegistry::standard();
        let beginner = registry.get("beginner").unwrap();
        let mut grid = SudokuGrid::new(3, 3).unwrap();

        for row in 0..9 {
            for column in 0..5 {
                grid.set_cell(column, row, (column + row) % 9 + 1).unwrap();
            }
        }

        let score = beginner.score(&grid);

        assert!(score >= 0.3 && score <= 0.6,
            "Beginner score {} is outside [0.3, 0.6].", score);
    }

    #[test]
    fn expert_outscores_beginner_on_a_sparse_grid() {
        let registry = TierRegistry::standard();
        let sparse = grid_with_clues(&[(0, 0), (4, 0), (8, 2), (2, 4),
            (6, 4), (0, 6), (4, 8), (8, 8)]);

        let beginner = registry.get("beginner").unwrap().score(&sparse);
        let expert = registry.get("expert").unwrap().score(&sparse);

        assert!(expert > beginner);
    }

    #[test]
    fn nominal_difficulty_targets_the_band_middle() {
        let registry = TierRegistry::standard();
        let beginner = registry.get("beginner").unwrap();
        let difficulty = beginner.nominal_difficulty(81);

        // mid of [40, 50] is 45 clues, so 36 of 81 cells are removed
        assert!((difficulty - 36.0 / 81.0).abs() < 1e-9);
    }

    #[test]
    fn below_min_clues_rule_stops_once_enough_clues_remain() {
        let rule = RetryRule::BelowMinClues { cap: 15 };

        assert!(rule.should_retry(3, 35, 40, 50));
        assert!(!rule.should_retry(3, 45, 40, 50));
        assert!(!rule.should_retry(15, 35, 40, 50));
    }

    #[test]
    fn outside_clue_band_rule_requires_the_band() {
        let rule = RetryRule::OutsideClueBand { cap: 12 };

        assert!(rule.should_retry(3, 45, 30, 40));
        assert!(rule.should_retry(3, 25, 30, 40));
        assert!(!rule.should_retry(3, 35, 30, 40));
        assert!(!rule.should_retry(12, 45, 30, 40));
    }

    #[test]
    fn registry_lookup_ignores_case() {
        let registry = TierRegistry::standard();

        assert!(registry.get("Beginner").is_some());
        assert!(registry.get("EXPERT").is_some());
        assert_eq!(None, registry.get("nightmare"));
    }

    #[test]
    fn registered_tiers_replace_existing_names() {
        let mut registry = TierRegistry::standard();
        let custom = Tier::new("Beginner", 45, 55,
            Scoring {
                clue_scale: ClueScale::Filled(50.0),
                weights: ScoreWeights {
                    clues: 1.0,
                    symmetry: 0.0,
                    distribution: 0.0
                },
                bonus: StructureBonus::None,
                base: 0.2,
                span: 0.2
            },
            RetryRule::Attempts { cap: 5 });

        registry.register(custom);

        let tier = registry.get("beginner").unwrap();
        assert_eq!(45, tier.min_clues());
        assert_eq!(55, tier.max_clues());
    }

    #[test]
    fn standard_registry_lists_four_tiers() {
        let registry = TierRegistry::standard();
        let names: Vec<&str> = registry.names().collect();

        assert_eq!(vec!["advanced", "beginner", "expert", "intermediate"],
            names);
    }

    #[test]
    fn tier_configurations_survive_serde() {
        let registry = TierRegistry::standard();
        let expert = registry.get("expert").unwrap();
        let json = serde_json::to_string(expert).unwrap();
        let deserialized: Tier = serde_json::from_str(&json).unwrap();

        assert_eq!(*expert, deserialized);
    }
}
