//! Elo formulas for singles and doubles
//!
//! Points are integers. Every update is computed in `f64` and truncated toward
//! zero, never rounded, so the exact integer totals are reproducible. There is
//! no floor: a player who keeps losing can end up below zero.

/// Maximum number of points a single match can move
pub const K_FACTOR: f64 = 32.0;

/// Probability that a player rated `own` beats one rated `opponent`
pub fn expected_score(own: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - own) / 400.0))
}

/// Apply `k * (actual - expected)` and truncate toward zero
fn adjust(points: i64, k_factor: f64, actual: f64, expected: f64) -> i64 {
    (points as f64 + k_factor * (actual - expected)) as i64
}

fn team_average(team: (i64, i64)) -> f64 {
    (team.0 as f64 + team.1 as f64) / 2.0
}

/// New `(winner, loser)` points after a singles match, K = 32
pub fn compute_elo_singles(winner_points: i64, loser_points: i64) -> (i64, i64) {
    compute_elo_singles_with_k(K_FACTOR, winner_points, loser_points)
}

/// Singles update with an explicit K-factor
pub fn compute_elo_singles_with_k(
    k_factor: f64,
    winner_points: i64,
    loser_points: i64,
) -> (i64, i64) {
    // Each side gets its own exponent rather than 1 - expected_winner
    let expected_winner = expected_score(winner_points as f64, loser_points as f64);
    let expected_loser = expected_score(loser_points as f64, winner_points as f64);

    (
        adjust(winner_points, k_factor, 1.0, expected_winner),
        adjust(loser_points, k_factor, 0.0, expected_loser),
    )
}

/// New points for both teams after a doubles match, K = 32
///
/// The expectation is computed once from the exact team averages. The
/// resulting delta is added to each player's own points and truncated per
/// player, so teammates on different totals can move by different integers.
pub fn compute_elo_doubles(
    winner_points: (i64, i64),
    loser_points: (i64, i64),
) -> ((i64, i64), (i64, i64)) {
    compute_elo_doubles_with_k(K_FACTOR, winner_points, loser_points)
}

/// Doubles update with an explicit K-factor
pub fn compute_elo_doubles_with_k(
    k_factor: f64,
    winner_points: (i64, i64),
    loser_points: (i64, i64),
) -> ((i64, i64), (i64, i64)) {
    let avg_winner = team_average(winner_points);
    let avg_loser = team_average(loser_points);

    let expected_winner = expected_score(avg_winner, avg_loser);
    let expected_loser = expected_score(avg_loser, avg_winner);

    (
        (
            adjust(winner_points.0, k_factor, 1.0, expected_winner),
            adjust(winner_points.1, k_factor, 1.0, expected_winner),
        ),
        (
            adjust(loser_points.0, k_factor, 0.0, expected_loser),
            adjust(loser_points.1, k_factor, 0.0, expected_loser),
        ),
    )
}

/// Singles update for a draw, scoring 0.5 for each side
pub fn compute_elo_singles_draw_with_k(k_factor: f64, a_points: i64, b_points: i64) -> (i64, i64) {
    let expected_a = expected_score(a_points as f64, b_points as f64);
    let expected_b = expected_score(b_points as f64, a_points as f64);

    (
        adjust(a_points, k_factor, 0.5, expected_a),
        adjust(b_points, k_factor, 0.5, expected_b),
    )
}

/// Doubles update for a draw, scoring 0.5 for each team
pub fn compute_elo_doubles_draw_with_k(
    k_factor: f64,
    team_a: (i64, i64),
    team_b: (i64, i64),
) -> ((i64, i64), (i64, i64)) {
    let avg_a = team_average(team_a);
    let avg_b = team_average(team_b);

    let expected_a = expected_score(avg_a, avg_b);
    let expected_b = expected_score(avg_b, avg_a);

    (
        (
            adjust(team_a.0, k_factor, 0.5, expected_a),
            adjust(team_a.1, k_factor, 0.5, expected_a),
        ),
        (
            adjust(team_b.0, k_factor, 0.5, expected_b),
            adjust(team_b.1, k_factor, 0.5, expected_b),
        ),
    )
}
