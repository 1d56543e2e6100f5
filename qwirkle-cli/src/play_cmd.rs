//! Play command - self-play between two greedy bots
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), choose_move(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use qwirkle_core::{
    EndReason, Engine, EngineConfig, GameId, GameState, GameStatus, Move, MoveResult, PlayerId,
    Suggestion,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Stop a game after this many committed moves
    #[arg(long, default_value = "500")]
    pub max_turns: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Save every finished session as JSON into this directory
    #[arg(long, value_name = "DIR")]
    pub record: Option<PathBuf>,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    game_id: GameId,
    scores: [u32; 2],
    winner: Option<PlayerId>,
    first_player_won: bool,
    turns: usize,
    end_reason: Option<EndReason>,
}

/// Aggregated results
#[derive(Clone, Debug)]
struct PlayResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    unfinished: usize,
    avg_turns: f32,
    avg_total_score: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Build an engine over an in-memory store
/// 2. Play the games
/// 3. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let engine = Engine::in_memory(EngineConfig {
        seed,
        suggest_moves: true,
    });

    tracing::info!(
        "Starting self-play: {} games, max {} turns",
        args.games,
        args.max_turns
    );

    let results = play_games(&engine, &args)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games
fn play_games(engine: &Engine, args: &PlayArgs) -> Result<PlayResults> {
    if let Some(dir) = &args.record {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create record directory: {}", dir.display()))?;
    }

    let mut games = Vec::with_capacity(args.games);
    for game_num in 1..=args.games {
        let record = play_single_game(engine, game_num, args)?;

        tracing::info!(
            "Game {}: {} - {} ({} turns, {:?})",
            record.game_number,
            record.scores[0],
            record.scores[1],
            record.turns,
            record.end_reason
        );

        games.push(record);
    }

    Ok(compute_statistics(games))
}

/// Report results
fn report_results(results: &PlayResults, args: &PlayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion or the turn cap
fn play_single_game(engine: &Engine, game_number: usize, args: &PlayArgs) -> Result<GameRecord> {
    let first = PlayerId(game_number as u64 * 2 - 1);
    let second = PlayerId(game_number as u64 * 2);

    let game = engine
        .create_game(first)
        .with_context(|| format!("Failed to create game {game_number}"))?
        .game_id;
    engine
        .join_game(game, second)
        .with_context(|| format!("Failed to join game {game_number}"))?;

    let mut turns = 0;
    while turns < args.max_turns {
        let overview = engine.get_game_state(game, first)?;
        if overview.status == GameStatus::Completed {
            break;
        }

        let player = overview.current_player;
        let state = if player == first {
            overview
        } else {
            engine.get_game_state(game, player)?
        };

        let mv = choose_move(&state);
        match engine.submit_move(game, player, &mv)? {
            MoveResult::Accepted { .. } => turns += 1,
            MoveResult::Rejected { reason } => {
                anyhow::bail!("Bot move {:?} rejected in game {}: {}", mv, game, reason)
            }
        }
    }

    let last = engine.get_game_state(game, first)?;

    if let Some(dir) = &args.record {
        let path = dir.join(format!("game_{game_number:04}.json"));
        engine
            .session(game)?
            .save(&path)
            .with_context(|| format!("Failed to record game to {}", path.display()))?;
    }

    let score_of = |p: PlayerId| last.scores.get(&p).copied().unwrap_or(0);
    Ok(GameRecord {
        game_number,
        game_id: game,
        scores: [score_of(first), score_of(second)],
        winner: last.winner,
        first_player_won: last.winner == Some(first),
        turns,
        end_reason: last.end_reason,
    })
}

/// Greedy policy: best placement, else swap the whole hand, else pass
fn choose_move(state: &GameState) -> Move {
    let best = state.available_moves.as_ref().and_then(|m| m.best());
    if let Some(Suggestion::Place { tiles, .. }) = best {
        return Move::Place {
            tiles: tiles.clone(),
        };
    }

    let hand = &state.your_hand;
    if !hand.is_empty() && state.remaining_deck >= hand.len() {
        Move::Exchange {
            tiles: hand.clone(),
        }
    } else {
        Move::Pass
    }
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> PlayResults {
    let finished = games.iter().filter(|g| g.winner.is_some());
    let first_wins = finished.clone().filter(|g| g.first_player_won).count();
    let second_wins = finished.count() - first_wins;
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();

    let (avg_turns, avg_total_score) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let n = games.len() as f32;
        let turns: usize = games.iter().map(|g| g.turns).sum();
        let score: u32 = games.iter().map(|g| g.scores[0] + g.scores[1]).sum();
        (turns as f32 / n, score as f32 / n)
    };

    PlayResults {
        games,
        first_wins,
        second_wins,
        unfinished,
        avg_turns,
        avg_total_score,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(results: &PlayResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        game_id: GameId,
        scores: [u32; 2],
        winner: Option<PlayerId>,
        turns: usize,
        end_reason: Option<EndReason>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first_player_wins: usize,
        second_player_wins: usize,
        unfinished: usize,
        avg_turns: f32,
        avg_total_score: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        first_player_wins: results.first_wins,
        second_player_wins: results.second_wins,
        unfinished: results.unfinished,
        avg_turns: results.avg_turns,
        avg_total_score: results.avg_total_score,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                game_id: g.game_id,
                scores: g.scores,
                winner: g.winner,
                turns: g.turns,
                end_reason: g.end_reason,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &PlayResults) {
    let total = results.games.len();

    println!("\n=== Self-Play Results ===");
    println!("Total games:   {}", total);
    println!(
        "First player:  {} ({:.1}%)",
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "Second player: {} ({:.1}%)",
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!("Unfinished:    {}", results.unfinished);
    println!("Avg turns:     {:.1}", results.avg_turns);
    println!("Avg points:    {:.1}", results.avg_total_score);

    println!("\n--- Games ---");
    for g in &results.games {
        let ending = match g.end_reason {
            Some(reason) => format!("{:?}", reason),
            None => "turn cap".to_string(),
        };
        println!(
            "#{:<4} {:>4} - {:<4} {:>4} turns  {}",
            g.game_number, g.scores[0], g.scores[1], g.turns, ending
        );
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qwirkle_core::{AvailableMoves, Placement, Position, Tile};
    use std::collections::BTreeMap;

    fn t(name: &str) -> Tile {
        name.parse().unwrap()
    }

    fn state_with(moves: Option<AvailableMoves>, hand: Vec<Tile>, deck: usize) -> GameState {
        GameState {
            game_id: GameId(1),
            status: GameStatus::Active,
            current_player: PlayerId(1),
            player1: PlayerId(1),
            player2: Some(PlayerId(2)),
            your_hand: hand,
            board: Vec::new(),
            scores: BTreeMap::new(),
            remaining_deck: deck,
            is_your_turn: true,
            available_moves: moves,
            winner: None,
            end_reason: None,
        }
    }

    fn args(games: usize, max_turns: usize) -> PlayArgs {
        PlayArgs {
            games,
            max_turns,
            json: false,
            record: None,
        }
    }

    #[test]
    fn test_bot_takes_best_placement() {
        let tiles = vec![Placement::new(Position::ORIGIN, t("red_circle"))];
        let moves = AvailableMoves {
            has_moves: true,
            moves: vec![
                Suggestion::Place {
                    tiles: tiles.clone(),
                    expected_points: 1,
                    affected_lines: Default::default(),
                },
                Suggestion::Exchange,
                Suggestion::Pass,
            ],
        };
        let state = state_with(Some(moves), vec![t("red_circle")], 90);
        assert_eq!(choose_move(&state), Move::Place { tiles });
    }

    #[test]
    fn test_bot_exchanges_then_passes() {
        let hand = vec![t("red_circle"), t("blue_star")];
        let stuck = AvailableMoves {
            has_moves: false,
            moves: vec![Suggestion::Exchange, Suggestion::Pass],
        };

        let state = state_with(Some(stuck.clone()), hand.clone(), 10);
        assert_eq!(choose_move(&state), Move::Exchange { tiles: hand.clone() });

        let state = state_with(Some(stuck), hand, 1);
        assert_eq!(choose_move(&state), Move::Pass);

        let state = state_with(None, Vec::new(), 0);
        assert_eq!(choose_move(&state), Move::Pass);
    }

    #[test]
    fn test_self_play_game_runs() {
        let engine = Engine::in_memory(EngineConfig::default().with_seed(31));
        let record = play_single_game(&engine, 1, &args(1, 400)).unwrap();

        assert!(record.turns > 0);
        assert!(record.turns <= 400);
        if record.end_reason.is_some() {
            assert!(record.winner.is_some());
        }
        let session = engine.session(record.game_id).unwrap();
        assert_eq!(session.history().len(), record.turns);
    }

    #[test]
    fn test_self_play_is_reproducible() {
        let play = || {
            let engine = Engine::in_memory(EngineConfig::default().with_seed(5));
            play_single_game(&engine, 1, &args(1, 40)).unwrap()
        };
        let a = play();
        let b = play();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.turns, b.turns);
    }

    #[test]
    fn test_record_writes_sessions() {
        let dir = std::env::temp_dir().join(format!("qwirkle-record-{}", std::process::id()));
        let engine = Engine::in_memory(EngineConfig::default().with_seed(3));
        let mut play_args = args(2, 6);
        play_args.record = Some(dir.clone());

        let results = play_games(&engine, &play_args).unwrap();
        assert_eq!(results.games.len(), 2);

        let saved = qwirkle_core::GameSession::load(&dir.join("game_0002.json")).unwrap();
        assert_eq!(saved.id(), results.games[1].game_id);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_compute_statistics() {
        let record = |n: usize, scores: [u32; 2], winner: Option<u64>| GameRecord {
            game_number: n,
            game_id: GameId(n as u64),
            scores,
            winner: winner.map(PlayerId),
            first_player_won: winner == Some(n as u64 * 2 - 1),
            turns: 10,
            end_reason: winner.map(|_| EndReason::ConsecutivePasses),
        };
        let results = compute_statistics(vec![
            record(1, [20, 10], Some(1)),
            record(2, [5, 15], Some(4)),
            record(3, [0, 0], None),
        ]);
        assert_eq!(results.first_wins, 1);
        assert_eq!(results.second_wins, 1);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_turns, 10.0);
        assert_eq!(results.avg_total_score, 50.0 / 3.0);
    }
}
