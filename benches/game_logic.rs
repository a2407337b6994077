use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nestris::core::{Board, GameSession, GameSettings};
use nestris::engine::{possible_moves, simulate_game, HeuristicChooser, SimulationConfig};
use nestris::types::{Cell, PieceKind};

fn level_18() -> GameSettings {
    GameSettings {
        starting_level: 18,
        ..GameSettings::default()
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut session = GameSession::new(level_18()).unwrap();

    c.bench_function("session_tick", |b| {
        b.iter(|| {
            if session.game_over() {
                session.restart();
            }
            session.tick();
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Cell::Filled);
                }
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_possible_moves(c: &mut Criterion) {
    let mut board = Board::new();
    for y in 12..20 {
        for x in 0..9 {
            if (x + y) % 7 != 0 {
                board.set(x, y, Cell::Filled);
            }
        }
    }

    c.bench_function("possible_moves_t", |b| {
        b.iter(|| possible_moves(black_box(&board), PieceKind::T, 18))
    });
}

fn bench_simulate_game(c: &mut Criterion) {
    let config = SimulationConfig {
        max_pieces: 200,
        ..SimulationConfig::default()
    };
    let chooser = HeuristicChooser::default();

    c.bench_function("simulate_200_pieces", |b| {
        b.iter(|| simulate_game(black_box(&config), &chooser))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_possible_moves,
    bench_simulate_game
);
criterion_main!(benches);
