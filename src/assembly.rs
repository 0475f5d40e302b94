//! This module contains the high-level puzzle assembly API. A
//! [PuzzleAssembler] owns a [TierRegistry](crate::difficulty::TierRegistry)
//! and turns a tier name into a finished [PuzzleBundle] by repeatedly
//! generating and carving candidates, scoring them under the tier, and
//! keeping the one whose score is closest to the tier's target.

use crate::SudokuGrid;
use crate::difficulty::{Tier, TierRegistry};
use crate::error::{SudokuError, SudokuResult};
use crate::generator::{CarvedPuzzle, Generator};

use rand::Rng;

use serde::{Deserialize, Serialize};

/// The hard cap on generation attempts per puzzle, independent of the tier's
/// own retry rule.
const ATTEMPT_LIMIT: usize = 30;

/// A finished puzzle as handed out by the [PuzzleAssembler]: the playable
/// board, its solution, a pristine copy of the initial board, and the
/// difficulty metadata under which it was produced.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PuzzleBundle {
    board: SudokuGrid,
    solution: SudokuGrid,
    initial_board: SudokuGrid,
    difficulty: f64,
    tier_name: String,
    seed: Option<u64>
}

impl PuzzleBundle {

    /// The playable board, intended to be mutated as the puzzle is worked
    /// on.
    pub fn board(&self) -> &SudokuGrid {
        &self.board
    }

    /// The full solution of the board. Solving [PuzzleBundle::initial_board]
    /// with an ascending-order solver run reproduces this grid exactly.
    pub fn solution(&self) -> &SudokuGrid {
        &self.solution
    }

    /// A pristine copy of the board as it was assembled, so the original
    /// clues remain available after [PuzzleBundle::board] has been modified.
    pub fn initial_board(&self) -> &SudokuGrid {
        &self.initial_board
    }

    /// The difficulty score of the board under the tier it was assembled
    /// for, in `[0, 1]`.
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// The display name of the tier this bundle was assembled for.
    pub fn difficulty_name(&self) -> &str {
        &self.tier_name
    }

    /// The seed this bundle was generated from, if one was provided.
    /// Assembling again with the same tier and seed reproduces the bundle.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

struct Candidate {
    carved: CarvedPuzzle,
    score: f64
}

/// Assembles finished [PuzzleBundle]s for named difficulty tiers. The
/// assembler owns its [TierRegistry], so two assemblers can be configured
/// with entirely different tier sets.
pub struct PuzzleAssembler {
    block_width: usize,
    block_height: usize,
    registry: TierRegistry
}

impl PuzzleAssembler {

    /// Creates a new assembler producing grids with the given block
    /// dimensions, using the given tier registry.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDimensions` If `block_width` or `block_height`
    /// is invalid (see [SudokuGrid::new]).
    pub fn new(block_width: usize, block_height: usize,
            registry: TierRegistry) -> SudokuResult<PuzzleAssembler> {
        // the grid constructor carries the dimension checks
        SudokuGrid::new(block_width, block_height)?;

        Ok(PuzzleAssembler {
            block_width,
            block_height,
            registry
        })
    }

    /// Creates an assembler for ordinary 9x9 grids with the
    /// [standard](TierRegistry::standard) tier registry.
    pub fn new_default() -> PuzzleAssembler {
        PuzzleAssembler {
            block_width: 3,
            block_height: 3,
            registry: TierRegistry::standard()
        }
    }

    /// The tier registry this assembler looks tiers up in.
    pub fn registry(&self) -> &TierRegistry {
        &self.registry
    }

    /// Mutable access to the tier registry, for registering custom tiers on
    /// an existing assembler.
    pub fn registry_mut(&mut self) -> &mut TierRegistry {
        &mut self.registry
    }

    /// Assembles a puzzle for the tier with the given name.
    ///
    /// Candidates are generated and carved at the tier's nominal clue
    /// density until the tier's retry rule is satisfied or the hard attempt
    /// limit is reached. Among all uniqueness-checked candidates, the one
    /// whose score lies closest to the tier's target score is kept. If every
    /// attempt produced an ambiguous board, a final unchecked carve is used
    /// so that a puzzle is always delivered.
    ///
    /// # Arguments
    ///
    /// * `tier_name`: The name of the tier to assemble for, matched against
    /// the registry ignoring case.
    /// * `seed`: If present, seeds the random number generator, making the
    /// assembly fully reproducible. Otherwise a thread-local generator is
    /// used.
    ///
    /// # Errors
    ///
    /// * `SudokuError::UnknownTier` If no tier with the given name is
    /// registered.
    /// * `SudokuError::Unsolvable` If generation fails internally, which
    /// does not happen for sensible block dimensions.
    pub fn generate_puzzle(&self, tier_name: &str, seed: Option<u64>)
            -> SudokuResult<PuzzleBundle> {
        let tier = self.registry.get(tier_name)
            .ok_or_else(|| SudokuError::UnknownTier(tier_name.to_owned()))?;

        match seed {
            Some(seed) => {
                let mut generator = Generator::new_seeded(seed);
                self.run(tier, &mut generator, Some(seed))
            },
            None => {
                let mut generator = Generator::new_default();
                self.run(tier, &mut generator, None)
            }
        }
    }

    fn run<R: Rng>(&self, tier: &Tier, generator: &mut Generator<R>,
            seed: Option<u64>) -> SudokuResult<PuzzleBundle> {
        let size = self.block_width * self.block_height;
        let cell_count = size * size;
        let difficulty = tier.nominal_difficulty(cell_count);
        let target = tier.target_score();
        let mut best: Option<Candidate> = None;
        let mut attempts = 0;

        loop {
            attempts += 1;

            let solution =
                generator.generate_solved(self.block_width,
                    self.block_height)?;

            match generator.carve(&solution, difficulty) {
                Ok(carved) => {
                    let score = tier.score(&carved.puzzle);
                    let closer = best.as_ref()
                        .map(|candidate|
                            (score - target).abs() <
                                (candidate.score - target).abs())
                        .unwrap_or(true);

                    if closer {
                        best = Some(Candidate {
                            carved,
                            score
                        });
                    }
                },
                // A candidate without a unique solution is discarded, not
                // escalated; the next carve removes a different set of
                // cells.
                Err(SudokuError::AmbiguousPuzzle) |
                Err(SudokuError::Unsolvable) => {
                    log::debug!(
                        "Discarded non-unique {:?} candidate on attempt {}.",
                        tier.name(), attempts);
                },
                Err(error) => return Err(error)
            }

            let keep_going = best.as_ref()
                .map(|candidate|
                    tier.should_retry(attempts,
                        candidate.carved.puzzle.count_clues()))
                .unwrap_or(true);

            if !keep_going || attempts >= ATTEMPT_LIMIT {
                break;
            }
        }

        let candidate = match best {
            Some(candidate) => {
                let clues = candidate.carved.puzzle.count_clues();

                if clues < tier.min_clues() || clues > tier.max_clues() {
                    log::warn!(
                        "Best {:?} candidate has {} clues, outside the band \
                        [{}, {}].",
                        tier.name(), clues, tier.min_clues(),
                        tier.max_clues());
                }

                candidate
            },
            None => {
                log::warn!(
                    "All {} carve attempts for {:?} were ambiguous, falling \
                    back to an unchecked puzzle.",
                    attempts, tier.name());

                let solution =
                    generator.generate_solved(self.block_width,
                        self.block_height)?;
                let carved = generator.carve_unchecked(&solution,
                    difficulty)?;
                let score = tier.score(&carved.puzzle);

                Candidate {
                    carved,
                    score
                }
            }
        };

        let initial_board = candidate.carved.puzzle.clone();

        Ok(PuzzleBundle {
            board: candidate.carved.puzzle,
            solution: candidate.carved.solution,
            initial_board,
            difficulty: candidate.score,
            tier_name: tier.name().to_owned(),
            seed
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::solver::BacktrackingSolver;

    #[test]
    fn unknown_tier_is_reported_with_its_name() {
        let assembler = PuzzleAssembler::new_default();
        let result = assembler.generate_puzzle("nightmare", Some(1));

        assert_eq!(Err(SudokuError::UnknownTier("nightmare".to_owned())),
            result);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert!(PuzzleAssembler::new(0, 3, TierRegistry::standard())
            .is_err());
        assert!(PuzzleAssembler::new(1, 1, TierRegistry::standard())
            .is_err());
    }

    #[test]
    fn assembled_puzzle_round_trips_to_its_solution() {
        let assembler = PuzzleAssembler::new_default();

        for tier_name in ["beginner", "intermediate"].iter() {
            let bundle =
                assembler.generate_puzzle(tier_name, Some(42)).unwrap();

            assert_eq!(Some(bundle.solution().clone()),
                BacktrackingSolver.solve_any(bundle.initial_board()),
                "Round trip failed for tier {}.", tier_name);
        }
    }

    #[test]
    fn board_and_initial_board_start_out_equal() {
        let assembler = PuzzleAssembler::new_default();
        let bundle = assembler.generate_puzzle("advanced", Some(7)).unwrap();

        assert_eq!(bundle.board(), bundle.initial_board());
        assert!(bundle.solution().is_full());
        assert!(bundle.solution().is_valid());
    }

    #[test]
    fn seeded_assembly_is_reproducible() {
        let assembler = PuzzleAssembler::new_default();
        let first = assembler.generate_puzzle("expert", Some(1234)).unwrap();
        let second = assembler.generate_puzzle("expert", Some(1234)).unwrap();

        assert_eq!(first, second);
        assert_eq!(Some(1234), first.seed());
    }

    #[test]
    fn beginner_puzzles_keep_a_generous_clue_count() {
        let assembler = PuzzleAssembler::new_default();

        for seed in 0..10 {
            let bundle =
                assembler.generate_puzzle("beginner", Some(seed)).unwrap();
            let clues = bundle.initial_board().count_clues();

            assert!(clues >= 40 && clues <= 50,
                "Beginner puzzle with seed {} has {} clues.", seed, clues);
        }
    }

    #[test]
    fn every_tier_lands_inside_its_clue_band() {
        let assembler = PuzzleAssembler::new_default();
        let tier_names = ["beginner", "intermediate", "advanced", "expert"];

        for tier_name in tier_names.iter() {
            let tier = assembler.registry().get(tier_name).unwrap().clone();

            for seed in 0..5 {
                let bundle =
                    assembler.generate_puzzle(tier_name, Some(seed)).unwrap();
                let clues = bundle.initial_board().count_clues();

                assert!(clues >= tier.min_clues() &&
                        clues <= tier.max_clues(),
                    "{} puzzle with seed {} has {} clues, outside [{}, {}].",
                    tier_name, seed, clues, tier.min_clues(),
                    tier.max_clues());
                assert_eq!(Some(bundle.solution().clone()),
                    BacktrackingSolver.solve_any(bundle.initial_board()),
                    "{} puzzle with seed {} does not round trip.",
                    tier_name, seed);
            }
        }
    }

    #[test]
    fn bundle_carries_tier_metadata() {
        let assembler = PuzzleAssembler::new_default();
        let bundle =
            assembler.generate_puzzle("Intermediate", Some(5)).unwrap();

        assert_eq!("intermediate", bundle.difficulty_name());
        assert!(bundle.difficulty() >= 0.0 && bundle.difficulty() <= 1.0);
    }

    #[test]
    fn custom_tiers_can_be_registered() {
        let mut assembler = PuzzleAssembler::new_default();
        let template = assembler.registry().get("beginner").unwrap().clone();
        let custom = Tier::new("training", template.min_clues(),
            template.max_clues(),
            crate::difficulty::Scoring {
                clue_scale: crate::difficulty::ClueScale::Filled(50.0),
                weights: crate::difficulty::ScoreWeights {
                    clues: 1.0,
                    symmetry: 0.0,
                    distribution: 0.0
                },
                bonus: crate::difficulty::StructureBonus::None,
                base: 0.1,
                span: 0.2
            },
            crate::difficulty::RetryRule::Attempts { cap: 3 });

        assembler.registry_mut().register(custom);

        let bundle = assembler.generate_puzzle("training", Some(3)).unwrap();

        assert_eq!("training", bundle.difficulty_name());
    }

    #[test]
    fn bundles_survive_serde() {
        let assembler = PuzzleAssembler::new_default();
        let bundle = assembler.generate_puzzle("beginner", Some(9)).unwrap();
        let json = serde_json::to_string(&bundle).unwrap();
        let deserialized: PuzzleBundle =
            serde_json::from_str(&json).unwrap();

        assert_eq!(bundle, deserialized);
    }
}
