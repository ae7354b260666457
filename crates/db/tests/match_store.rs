//! Database tests for the match record store: uniqueness guarantees,
//! conditional responses, overdue expiry and their behaviour under
//! concurrent writers.

use alumni_core::matching::scoring::ScoreBreakdown;
use alumni_core::matching::status::MatchStatus;
use alumni_core::matching::{EXPIRED_REASON, MATCH_TYPE_ALGORITHMIC};
use alumni_core::types::{DbId, Timestamp};
use alumni_db::models::match_record::{CreateMatch, MatchRecord};
use alumni_db::models::mentor::CreateProgramMentor;
use alumni_db::models::program::CreateProgram;
use alumni_db::models::registration::CreateRegistration;
use alumni_db::repositories::{MatchRepo, MentorRepo, ProgramRepo, RegistrationRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

#[derive(Clone, Copy)]
struct Fixture {
    program_id: DbId,
    registration_id: DbId,
    mentee_user_id: DbId,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let program = ProgramRepo::create(
        pool,
        &CreateProgram {
            name: "Store Test".to_string(),
            description: None,
            response_window_days: None,
        },
        1,
    )
    .await
    .unwrap();

    for user_id in [10, 11] {
        MentorRepo::upsert(
            pool,
            &CreateProgramMentor {
                program_id: program.id,
                user_id,
                name: format!("Mentor {user_id}"),
                email: format!("m{user_id}@alumni.test"),
                industry: None,
                programme: None,
                skills: vec![],
                max_mentees: 2,
            },
        )
        .await
        .unwrap();
    }

    let registration = RegistrationRepo::create(
        pool,
        &CreateRegistration {
            program_id: program.id,
            user_id: 20,
            name: "Mentee".to_string(),
            email: "mentee@alumni.test".to_string(),
            class_year: Some(2024),
            programme: None,
            industry: None,
            areas_of_interest: vec![],
            preferred_mentor_ids: vec![],
        },
    )
    .await
    .unwrap();

    Fixture {
        program_id: program.id,
        registration_id: registration.id,
        mentee_user_id: registration.user_id,
    }
}

async fn insert_match(
    pool: &PgPool,
    f: &Fixture,
    mentor_user_id: DbId,
    auto_reject_at: Timestamp,
) -> Result<MatchRecord, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    MatchRepo::create(
        &mut conn,
        &CreateMatch {
            program_id: f.program_id,
            registration_id: f.registration_id,
            mentee_user_id: f.mentee_user_id,
            mentor_user_id,
            match_type: MATCH_TYPE_ALGORITHMIC.to_string(),
            preferred_choice_order: None,
            match_score: 40,
            breakdown: ScoreBreakdown {
                industry_score: 0,
                programme_score: 100,
                skills_score: 50,
                preference_score: 0,
            },
            matched_at: auto_reject_at - Duration::days(7),
            auto_reject_at,
        },
    )
    .await
}

fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_active_match_for_registration_is_refused(pool: PgPool) {
    let f = fixture(&pool).await;
    let deadline = Utc::now() + Duration::days(7);

    insert_match(&pool, &f, 10, deadline).await.unwrap();
    let err = insert_match(&pool, &f, 11, deadline).await.unwrap_err();

    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("uq_match_records_active_registration")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_mentor_is_never_proposed_twice(pool: PgPool) {
    let f = fixture(&pool).await;
    let now = Utc::now();
    let first = insert_match(&pool, &f, 10, now + Duration::days(7))
        .await
        .unwrap();
    MatchRepo::respond(&pool, first.id, 10, MatchStatus::Rejected, Some("busy"), now)
        .await
        .unwrap()
        .expect("pending match should be rejected");

    let err = insert_match(&pool, &f, 10, now + Duration::days(7))
        .await
        .unwrap_err();
    assert_eq!(
        constraint_of(&err).as_deref(),
        Some("uq_match_records_registration_mentor")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn respond_only_succeeds_once_for_owner_before_deadline(pool: PgPool) {
    let f = fixture(&pool).await;
    let now = Utc::now();
    let record = insert_match(&pool, &f, 10, now + Duration::days(3))
        .await
        .unwrap();

    let foreign = MatchRepo::respond(&pool, record.id, 11, MatchStatus::Accepted, None, now)
        .await
        .unwrap();
    assert!(foreign.is_none());

    let late = MatchRepo::respond(
        &pool,
        record.id,
        10,
        MatchStatus::Accepted,
        None,
        now + Duration::days(4),
    )
    .await
    .unwrap();
    assert!(late.is_none());

    let accepted = MatchRepo::respond(&pool, record.id, 10, MatchStatus::Accepted, None, now)
        .await
        .unwrap()
        .expect("owner should be able to accept");
    assert_eq!(accepted.status(), Some(MatchStatus::Accepted));
    assert!(accepted.responded_at.is_some());

    let again = MatchRepo::respond(&pool, record.id, 10, MatchStatus::Rejected, None, now)
        .await
        .unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expire_overdue_only_touches_pending_past_deadline(pool: PgPool) {
    let f = fixture(&pool).await;
    let now = Utc::now();
    let overdue = insert_match(&pool, &f, 10, now - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(MatchRepo::count_overdue(&pool, now).await.unwrap(), 1);
    let expired = MatchRepo::expire_overdue(&pool, now, EXPIRED_REASON)
        .await
        .unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(MatchRepo::count_overdue(&pool, now).await.unwrap(), 0);
    assert_eq!(expired[0].id, overdue.id);
    assert_eq!(expired[0].status(), Some(MatchStatus::Expired));
    assert_eq!(expired[0].rejection_reason.as_deref(), Some(EXPIRED_REASON));

    // Expired no longer counts as active, so a new mentor can be proposed.
    let fresh = insert_match(&pool, &f, 11, now + Duration::days(7))
        .await
        .unwrap();
    let again = MatchRepo::expire_overdue(&pool, now, EXPIRED_REASON)
        .await
        .unwrap();
    assert!(again.is_empty());

    let mut conn = pool.acquire().await.unwrap();
    let active = MatchRepo::find_active_for_registration(&mut conn, f.registration_id)
        .await
        .unwrap()
        .expect("fresh match is active");
    assert_eq!(active.id, fresh.id);
    assert_eq!(
        MatchRepo::tried_mentor_ids(&mut conn, f.registration_id)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mentor_load_counts_only_active_matches(pool: PgPool) {
    let f = fixture(&pool).await;
    let now = Utc::now();
    insert_match(&pool, &f, 10, now - Duration::hours(1))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let program = ProgramRepo::find_in_tx(&mut conn, f.program_id)
        .await
        .unwrap()
        .expect("program exists");
    assert_eq!(program.name, "Store Test");
    assert_eq!(
        MentorRepo::active_load(&mut conn, f.program_id, 10)
            .await
            .unwrap(),
        1
    );

    MatchRepo::expire_overdue(&pool, now, EXPIRED_REASON)
        .await
        .unwrap();
    let mentors = MentorRepo::list_with_load(&mut conn, f.program_id)
        .await
        .unwrap();
    assert_eq!(mentors.len(), 2);
    assert!(mentors.iter().all(|m| m.active_load == 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_responses_have_exactly_one_winner(pool: PgPool) {
    let f = fixture(&pool).await;
    let now = Utc::now();
    let match_id = insert_match(&pool, &f, 10, now + Duration::days(3))
        .await
        .unwrap()
        .id;

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let pool = pool.clone();
            let to = if i % 2 == 0 {
                MatchStatus::Accepted
            } else {
                MatchStatus::Rejected
            };
            tokio::spawn(async move {
                MatchRepo::respond(&pool, match_id, 10, to, Some("busy"), now).await
            })
        })
        .collect();

    let mut winners = Vec::new();
    for task in tasks {
        if let Some(record) = task.await.unwrap().unwrap() {
            winners.push(record);
        }
    }
    assert_eq!(winners.len(), 1);
    assert_ne!(winners[0].status(), Some(MatchStatus::Pending));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn racing_inserts_leave_one_active_match(pool: PgPool) {
    let f = fixture(&pool).await;
    let deadline = Utc::now() + Duration::days(7);

    let tasks: Vec<_> = [10, 11, 10, 11, 10, 11]
        .into_iter()
        .map(|mentor_user_id| {
            let pool = pool.clone();
            tokio::spawn(async move { insert_match(&pool, &f, mentor_user_id, deadline).await })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => {
                let constraint = constraint_of(&e).unwrap_or_default();
                assert!(constraint.starts_with("uq_match_records_"), "{e}");
            }
        }
    }
    assert_eq!(created, 1);
}
