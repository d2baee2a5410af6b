//! Quiz rules: player resolution, quiz drawing, grading and progress.
//!
//! The pure rules are free functions so they can be tested without a
//! database; [`QuizService`] wires them to the stores. Each service call
//! is a single short storage session and keeps no state between calls.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use verbquiz_store::{Database, ResultStore, StoreError, Verb, VerbStore};

/// Player name used when the caller supplies none.
pub const DEFAULT_PLAYER: &str = "guest";

/// Largest quiz a caller may request.
pub const MAX_QUIZ_SIZE: i64 = 200;

/// Size range drawn from when the caller does not pick one.
pub const RANDOM_QUIZ_SIZE: RangeInclusive<usize> = 5..=25;

// ═══════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════

/// Failures surfaced by quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Requested quiz size outside `1..=MAX_QUIZ_SIZE`.
    #[error("quiz size must be between 1 and {MAX_QUIZ_SIZE}, got {0}")]
    InvalidSize(i64),

    /// The verb pool is smaller than the requested quiz.
    #[error("not enough verbs in the database: {requested} requested, {available} available")]
    NotEnoughVerbs { requested: usize, available: usize },

    /// No verb has this id.
    #[error("verb not found: {0}")]
    VerbNotFound(i64),

    /// The query string or body could not be decoded.
    #[error("{message}")]
    MalformedRequest { status: u16, message: String },

    /// Any other storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ═══════════════════════════════════════════════════════════════════════
//  Wire types
// ═══════════════════════════════════════════════════════════════════════

/// A submitted answer for one verb.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub verb_id: i64,
    #[serde(alias = "user_past")]
    pub submitted_past: String,
    #[serde(alias = "user_participle")]
    pub submitted_participle: String,
}

/// The canonical forms of a graded verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedForms {
    pub past: String,
    pub participle: String,
}

/// Outcome of grading one answer. The expected forms are always included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub correct: bool,
    pub expected: ExpectedForms,
}

/// Success statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub player: String,
    pub total: i64,
    #[serde(rename = "successCount")]
    pub success_count: i64,
    /// Percentage of successful attempts, one decimal place.
    pub rate: f64,
}

/// Outcome of a progress reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub deleted: usize,
}

// ═══════════════════════════════════════════════════════════════════════
//  Rules
// ═══════════════════════════════════════════════════════════════════════

/// Trim the caller-supplied name; blank or missing becomes [`DEFAULT_PLAYER`].
pub fn resolve_player(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => DEFAULT_PLAYER.to_owned(),
    }
}

/// Validate a requested quiz size, or pick one from [`RANDOM_QUIZ_SIZE`].
pub fn resolve_quiz_size<R: Rng + ?Sized>(
    requested: Option<i64>,
    rng: &mut R,
) -> Result<usize, QuizError> {
    match requested {
        Some(size) if (1..=MAX_QUIZ_SIZE).contains(&size) => Ok(size as usize),
        Some(size) => Err(QuizError::InvalidSize(size)),
        None => Ok(rng.gen_range(RANDOM_QUIZ_SIZE)),
    }
}

/// Draw `size` distinct verbs uniformly at random, in shuffled order.
pub fn draw_quiz<R: Rng + ?Sized>(
    mut pool: Vec<Verb>,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Verb>, QuizError> {
    if pool.len() < size {
        return Err(QuizError::NotEnoughVerbs {
            requested: size,
            available: pool.len(),
        });
    }
    pool.shuffle(rng);
    pool.truncate(size);
    Ok(pool)
}

/// Both forms must match, ignoring case and surrounding whitespace.
pub fn is_correct(verb: &Verb, past: &str, participle: &str) -> bool {
    past.trim().to_lowercase() == verb.past.to_lowercase()
        && participle.trim().to_lowercase() == verb.past_participle.to_lowercase()
}

/// `success / total` as a percentage rounded to one decimal, ties to
/// even; `0.0` when there are no attempts.
pub fn success_rate(success_count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = success_count as f64 / total as f64 * 100.0;
    (percent * 10.0).round_ties_even() / 10.0
}

// ═══════════════════════════════════════════════════════════════════════
//  QuizService
// ═══════════════════════════════════════════════════════════════════════

/// Stateless quiz operations over the verb and result stores.
#[derive(Clone)]
pub struct QuizService {
    verbs: VerbStore,
    results: ResultStore,
}

impl QuizService {
    /// Create a service backed by `db`.
    pub fn new(db: Database) -> Self {
        Self {
            verbs: VerbStore::new(db.clone()),
            results: ResultStore::new(db),
        }
    }

    /// Every verb in storage order.
    pub async fn list_verbs(&self) -> Result<Vec<Verb>, QuizError> {
        Ok(self.verbs.list().await?)
    }

    /// Number of verbs available for quizzes.
    pub async fn verb_count(&self) -> Result<i64, QuizError> {
        Ok(self.verbs.count().await?)
    }

    /// Draw a quiz of `size` verbs, or a random size when `None`.
    pub async fn draw(&self, size: Option<i64>) -> Result<Vec<Verb>, QuizError> {
        let size = resolve_quiz_size(size, &mut rand::thread_rng())?;
        let pool = self.verbs.list().await?;
        draw_quiz(pool, size, &mut rand::thread_rng())
    }

    /// Grade an answer and record the attempt for `player`.
    pub async fn grade(
        &self,
        player: &str,
        answer: &AnswerSubmission,
    ) -> Result<Grade, QuizError> {
        let verb = self.verbs.get(answer.verb_id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => QuizError::VerbNotFound(answer.verb_id),
            other => QuizError::Store(other),
        })?;

        let correct = is_correct(
            &verb,
            &answer.submitted_past,
            &answer.submitted_participle,
        );
        self.results.record(verb.id, player, correct).await?;
        debug!(player, verb = %verb.infinitive, correct, "answer graded");

        Ok(Grade {
            correct,
            expected: ExpectedForms {
                past: verb.past,
                participle: verb.past_participle,
            },
        })
    }

    /// Attempt counts and success rate for `player`.
    pub async fn progress(&self, player: &str) -> Result<Progress, QuizError> {
        let counts = self.results.counts(player).await?;
        Ok(Progress {
            player: player.to_owned(),
            total: counts.total,
            success_count: counts.success_count,
            rate: success_rate(counts.success_count, counts.total),
        })
    }

    /// Delete every attempt recorded for exactly `player`.
    pub async fn reset(&self, player: &str) -> Result<ResetOutcome, QuizError> {
        let deleted = self.results.delete_for_player(player).await?;
        Ok(ResetOutcome { deleted })
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use verbquiz_store::{NewVerb, seed_records};

    use super::*;

    fn verb(id: i64, past: &str, participle: &str) -> Verb {
        Verb {
            id,
            infinitive: format!("verb{id}"),
            past: past.into(),
            past_participle: participle.into(),
            translation: String::new(),
        }
    }

    fn pool(n: i64) -> Vec<Verb> {
        (1..=n).map(|id| verb(id, "p", "pp")).collect()
    }

    async fn service_with(verbs: &[(&str, &str, &str)]) -> QuizService {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        let records = verbs
            .iter()
            .map(|(inf, past, pp)| NewVerb {
                infinitive: (*inf).into(),
                past: (*past).into(),
                past_participle: (*pp).into(),
                translation: String::new(),
            })
            .collect();
        seed_records(&db, records).await.unwrap();
        QuizService::new(db)
    }

    // ── player ──────────────────────────────────────────────────────

    #[test]
    fn player_is_trimmed_and_defaults_to_guest() {
        assert_eq!(resolve_player(None), "guest");
        assert_eq!(resolve_player(Some("")), "guest");
        assert_eq!(resolve_player(Some("   ")), "guest");
        assert_eq!(resolve_player(Some("  Ana ")), "Ana");
    }

    // ── quiz size ───────────────────────────────────────────────────

    #[test]
    fn omitted_size_is_between_5_and_25() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let size = resolve_quiz_size(None, &mut rng).unwrap();
            assert!(RANDOM_QUIZ_SIZE.contains(&size), "size {size}");
        }
    }

    #[test]
    fn explicit_size_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(resolve_quiz_size(Some(1), &mut rng).unwrap(), 1);
        assert_eq!(resolve_quiz_size(Some(200), &mut rng).unwrap(), 200);
        assert!(matches!(
            resolve_quiz_size(Some(0), &mut rng),
            Err(QuizError::InvalidSize(0))
        ));
        assert!(matches!(
            resolve_quiz_size(Some(201), &mut rng),
            Err(QuizError::InvalidSize(201))
        ));
        assert!(matches!(
            resolve_quiz_size(Some(-3), &mut rng),
            Err(QuizError::InvalidSize(-3))
        ));
    }

    // ── drawing ─────────────────────────────────────────────────────

    #[test]
    fn draw_returns_distinct_members_of_the_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        for size in [1, 5, 17, 40] {
            let drawn = draw_quiz(pool(40), size, &mut rng).unwrap();
            assert_eq!(drawn.len(), size);
            let ids: HashSet<i64> = drawn.iter().map(|v| v.id).collect();
            assert_eq!(ids.len(), size, "duplicates in draw of {size}");
            assert!(ids.iter().all(|id| (1..=40).contains(id)));
        }
    }

    #[test]
    fn draw_of_whole_pool_is_shuffled() {
        let mut rng = StdRng::seed_from_u64(3);
        let storage_order: Vec<i64> = (1..=50).collect();
        let drawn: Vec<i64> = draw_quiz(pool(50), 50, &mut rng)
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();

        let mut sorted = drawn.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, storage_order);
        assert_ne!(drawn, storage_order);
    }

    #[test]
    fn draw_larger_than_pool_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = draw_quiz(pool(3), 4, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            QuizError::NotEnoughVerbs {
                requested: 4,
                available: 3
            }
        ));
    }

    // ── grading ─────────────────────────────────────────────────────

    #[test]
    fn grading_ignores_case_and_whitespace() {
        let go = verb(1, "went", "gone");
        assert!(is_correct(&go, " Went ", "GONE"));
        assert!(is_correct(&go, "went", "gone"));
    }

    #[test]
    fn grading_needs_both_forms() {
        let go = verb(1, "went", "gone");
        assert!(!is_correct(&go, "went", "went"));
        assert!(!is_correct(&go, "gone", "gone"));
        assert!(!is_correct(&go, "", ""));
        assert!(!is_correct(&go, "w ent", "gone"));
    }

    #[test]
    fn grading_compares_against_lowercased_stored_forms() {
        let be = verb(1, "Was/Were", "Been");
        assert!(is_correct(&be, "was/were", "been"));
    }

    // ── rate ────────────────────────────────────────────────────────

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(success_rate(3, 7), 42.9);
        assert_eq!(success_rate(1, 3), 33.3);
        assert_eq!(success_rate(2, 3), 66.7);
        assert_eq!(success_rate(5, 5), 100.0);
        assert_eq!(success_rate(0, 4), 0.0);
    }

    #[test]
    fn rate_halfway_cases_round_to_even() {
        assert_eq!(success_rate(1, 16), 6.2);
        assert_eq!(success_rate(5, 16), 31.2);
        assert_eq!(success_rate(3, 16), 18.8);
        assert_eq!(success_rate(1, 8), 12.5);
    }

    #[test]
    fn rate_without_attempts_is_zero() {
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test]
    fn progress_serializes_success_count_in_camel_case() {
        let json = serde_json::to_value(Progress {
            player: "guest".into(),
            total: 7,
            success_count: 3,
            rate: 42.9,
        })
        .unwrap();
        assert_eq!(json["successCount"], 3);
        assert_eq!(json["rate"], 42.9);
        assert!(json.get("success_count").is_none());
    }

    #[test]
    fn submission_accepts_legacy_field_names() {
        let answer: AnswerSubmission = serde_json::from_str(
            r#"{"verb_id": 4, "user_past": "went", "user_participle": "gone"}"#,
        )
        .unwrap();
        assert_eq!(answer.submitted_past, "went");
        assert_eq!(answer.submitted_participle, "gone");
    }

    // ── service ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn grade_records_one_result_per_call() {
        let service = service_with(&[("go", "went", "gone")]).await;
        let id = service.list_verbs().await.unwrap()[0].id;

        let wrong = AnswerSubmission {
            verb_id: id,
            submitted_past: "goed".into(),
            submitted_participle: "goed".into(),
        };
        let grade = service.grade("ana", &wrong).await.unwrap();
        assert!(!grade.correct);
        assert_eq!(
            grade.expected,
            ExpectedForms {
                past: "went".into(),
                participle: "gone".into()
            }
        );

        let right = AnswerSubmission {
            verb_id: id,
            submitted_past: " Went ".into(),
            submitted_participle: "GONE".into(),
        };
        let grade = service.grade("ana", &right).await.unwrap();
        assert!(grade.correct);
        assert_eq!(grade.expected.past, "went");

        let progress = service.progress("ana").await.unwrap();
        assert_eq!((progress.total, progress.success_count), (2, 1));
        assert_eq!(progress.rate, 50.0);
    }

    #[tokio::test]
    async fn grade_unknown_verb_records_nothing() {
        let service = service_with(&[("go", "went", "gone")]).await;
        let answer = AnswerSubmission {
            verb_id: 12_345,
            submitted_past: "went".into(),
            submitted_participle: "gone".into(),
        };
        let err = service.grade("ana", &answer).await.unwrap_err();
        assert!(matches!(err, QuizError::VerbNotFound(12_345)));
        assert_eq!(service.progress("ana").await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn progress_for_new_player_is_zero() {
        let service = service_with(&[("go", "went", "gone")]).await;
        let progress = service.progress("nobody").await.unwrap();
        assert_eq!(progress.player, "nobody");
        assert_eq!(progress.total, 0);
        assert_eq!(progress.rate, 0.0);
    }

    #[tokio::test]
    async fn reset_twice_returns_zero_the_second_time() {
        let service = service_with(&[("go", "went", "gone")]).await;
        let id = service.list_verbs().await.unwrap()[0].id;
        let answer = AnswerSubmission {
            verb_id: id,
            submitted_past: "went".into(),
            submitted_participle: "gone".into(),
        };
        service.grade("ana", &answer).await.unwrap();
        service.grade("ana", &answer).await.unwrap();
        service.grade("bo", &answer).await.unwrap();

        assert_eq!(service.reset("ana").await.unwrap().deleted, 2);
        assert_eq!(service.reset("ana").await.unwrap().deleted, 0);
        assert_eq!(service.progress("bo").await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn draw_checks_pool_size() {
        let service = service_with(&[
            ("go", "went", "gone"),
            ("see", "saw", "seen"),
            ("take", "took", "taken"),
        ])
        .await;

        assert_eq!(service.draw(Some(3)).await.unwrap().len(), 3);
        assert!(matches!(
            service.draw(Some(4)).await,
            Err(QuizError::NotEnoughVerbs { .. })
        ));
        // Every random size (5..=25) exceeds a pool of three.
        assert!(matches!(
            service.draw(None).await,
            Err(QuizError::NotEnoughVerbs { .. })
        ));
    }
}
