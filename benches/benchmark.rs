use criterion::{
    criterion_group,
    criterion_main,
    BenchmarkGroup,
    Criterion,
    SamplingMode
};
use criterion::measurement::WallTime;

use sudoku_forge::SudokuGrid;
use sudoku_forge::assembly::PuzzleAssembler;
use sudoku_forge::generator::Generator;
use sudoku_forge::solver::BacktrackingSolver;

use std::time::Duration;

// WPF Sudoku GP 2020 Round 8, Puzzle 2 (classic)
const CLASSIC_PUZZLE: &str = "3x3;\
     , , , ,8,1, , , ,\
     , ,2, , ,7,8, , ,\
     ,5,3, , , ,1,7, ,\
    3,7, , , , , , , ,\
    6, , , , , , , ,3,\
     , , , , , , ,2,4,\
     ,6,9, , , ,2,3, ,\
     , ,5,9, , ,4, , ,\
     , , ,6,5, , , , ";

fn group<'a>(c: &'a mut Criterion, name: &str)
        -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group.sampling_mode(SamplingMode::Flat)
        .measurement_time(Duration::from_secs(30))
        .sample_size(10);
    group
}

fn benchmark_solve(c: &mut Criterion) {
    let puzzle = SudokuGrid::parse(CLASSIC_PUZZLE).unwrap();
    let mut group = group(c, "solve");

    group.bench_function("classic 9x9", |b| b.iter(
        || BacktrackingSolver.solve_any(&puzzle)));
    group.bench_function("uniqueness probe", |b| b.iter(
        || BacktrackingSolver.solve(&puzzle)));
}

fn benchmark_generate(c: &mut Criterion) {
    let mut group = group(c, "generate");

    group.bench_function("solved 9x9", |b| b.iter(
        || Generator::new_seeded(42).generate_solved(3, 3).unwrap()));
    group.bench_function("carved 9x9", |b| b.iter(|| {
        let mut generator = Generator::new_seeded(42);
        let solution = generator.generate_solved(3, 3).unwrap();
        generator.carve_unchecked(&solution, 0.5).unwrap()
    }));
}

fn benchmark_assemble(c: &mut Criterion) {
    let assembler = PuzzleAssembler::new_default();
    let mut group = group(c, "assemble");

    for tier in ["beginner", "intermediate", "advanced", "expert"].iter() {
        group.bench_function(*tier, |b| b.iter(
            || assembler.generate_puzzle(tier, Some(42)).unwrap()));
    }
}

criterion_group!(all_groups,
    benchmark_solve,
    benchmark_generate,
    benchmark_assemble
);
criterion_main!(all_groups);
