//! PostgreSQL repository integration tests.
//!
//! These run only when `DATABASE_URL` points at a disposable database and
//! are skipped otherwise. Each test registers its own users, so tests never
//! see each other's rows.

use applydiary_db::{
    ApplicationFilter, ApplicationPatch, ApplicationRepository, ApplicationSort, ApplicationStatus,
    Database, DocumentRepository, Error, Location, NewApplication, NewDocument, NewUser,
    NoteRepository, OwnerScope, UserRepository,
};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

async fn test_db() -> Option<Database> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let db = Database::connect(&url).await.expect("connect to DATABASE_URL");
    sqlx::migrate!("../../migrations")
        .run(db.pool())
        .await
        .expect("run migrations");
    Some(db)
}

async fn new_user(db: &Database) -> Uuid {
    db.users
        .insert(NewUser {
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$stub".to_string(),
            name: "Ada".to_string(),
            timezone: "UTC".to_string(),
        })
        .await
        .unwrap()
        .id
}

fn app(company: &str, applied: DateTime<Utc>, deadline: Option<DateTime<Utc>>) -> NewApplication {
    NewApplication {
        company: company.to_string(),
        role: "Engineer".to_string(),
        status: ApplicationStatus::Applied,
        applied_date: applied,
        location: Location::Hybrid,
        deadline,
        notes: Some("legacy text".to_string()),
        source: None,
        resume_url: None,
        cover_url: None,
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, d, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_pg_duplicate_email_case_insensitive() {
    let Some(db) = test_db().await else { return };
    let email = format!("{}@Example.com", Uuid::new_v4());
    let first = db
        .users
        .insert(NewUser {
            email: email.clone(),
            password_hash: "h".to_string(),
            name: "A".to_string(),
            timezone: "UTC".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(first.email, email.to_lowercase());

    let err = db
        .users
        .insert(NewUser {
            email: email.to_uppercase(),
            password_hash: "h".to_string(),
            name: "B".to_string(),
            timezone: "UTC".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateEmail));

    let found = db.users.find_by_email(&email.to_uppercase()).await.unwrap();
    assert_eq!(found.unwrap().id, first.id);
}

#[tokio::test]
async fn test_pg_application_lifecycle() {
    let Some(db) = test_db().await else { return };
    let owner = new_user(&db).await;
    let other = new_user(&db).await;

    let created = db
        .applications
        .insert(owner, app("Acme_Corp", day(1), None))
        .await
        .unwrap();
    assert_eq!(created.status, ApplicationStatus::Applied);

    // Wildcards in search are literal
    let filter = ApplicationFilter {
        search: Some("e_c".to_string()),
        ..Default::default()
    };
    let hits = db
        .applications
        .list(OwnerScope::live(owner), &filter)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    let filter = ApplicationFilter {
        search: Some("%".to_string()),
        ..Default::default()
    };
    assert!(db
        .applications
        .list(OwnerScope::live(owner), &filter)
        .await
        .unwrap()
        .is_empty());

    assert!(db
        .applications
        .fetch(OwnerScope::live(other), created.id)
        .await
        .unwrap()
        .is_none());

    let patch = ApplicationPatch {
        status: Some(ApplicationStatus::Offer),
        notes: Some(None),
        ..Default::default()
    };
    let updated = db
        .applications
        .update(owner, created.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, ApplicationStatus::Offer);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.company, "Acme_Corp");
    assert!(db
        .applications
        .update(other, created.id, &patch)
        .await
        .unwrap()
        .is_none());

    assert!(db
        .applications
        .soft_delete(owner, created.id)
        .await
        .unwrap()
        .is_some());
    assert!(db
        .applications
        .soft_delete(owner, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(db
        .applications
        .list(OwnerScope::live(owner), &ApplicationFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        db.applications
            .list(OwnerScope::include_deleted(owner), &ApplicationFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_pg_deadline_sort() {
    let Some(db) = test_db().await else { return };
    let owner = new_user(&db).await;
    for (company, applied, deadline) in [
        ("none", day(9), None),
        ("soon", day(1), Some(day(10))),
        ("later", day(1), Some(day(20))),
    ] {
        db.applications
            .insert(owner, app(company, applied, deadline))
            .await
            .unwrap();
    }
    let filter = ApplicationFilter {
        sort: ApplicationSort::Deadline,
        ..Default::default()
    };
    let order: Vec<String> = db
        .applications
        .list(OwnerScope::live(owner), &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.company)
        .collect();
    assert_eq!(order, vec!["later", "soon", "none"]);
}

#[tokio::test]
async fn test_pg_notes_scoped_to_live_parent() {
    let Some(db) = test_db().await else { return };
    let owner = new_user(&db).await;
    let parent = db
        .applications
        .insert(owner, app("Acme", day(1), None))
        .await
        .unwrap();
    let sibling = db
        .applications
        .insert(owner, app("Globex", day(1), None))
        .await
        .unwrap();

    let note = db
        .notes
        .insert(owner, parent.id, "first")
        .await
        .unwrap()
        .unwrap();
    db.notes.insert(owner, parent.id, "second").await.unwrap().unwrap();

    let listed = db
        .notes
        .list_for_application(OwnerScope::live(owner), parent.id, Some(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "second");

    assert!(db
        .notes
        .update(owner, sibling.id, note.id, "moved")
        .await
        .unwrap()
        .is_none());

    db.applications.soft_delete(owner, parent.id).await.unwrap();
    assert!(db
        .notes
        .list_for_application(OwnerScope::live(owner), parent.id, None)
        .await
        .unwrap()
        .is_none());
    assert!(db
        .notes
        .update(owner, parent.id, note.id, "edit")
        .await
        .unwrap()
        .is_none());
    assert!(db
        .notes
        .insert(owner, parent.id, "late")
        .await
        .unwrap()
        .is_none());

    // Preserved, not purged
    let audit = db
        .notes
        .fetch(OwnerScope::include_deleted(owner), parent.id, note.id)
        .await
        .unwrap();
    assert!(audit.is_some());
}

#[tokio::test]
async fn test_pg_documents() {
    let Some(db) = test_db().await else { return };
    let owner = new_user(&db).await;
    let doc = db
        .documents
        .insert(
            owner,
            NewDocument {
                file_name: "cv.pdf".to_string(),
                file_type: "application/pdf".to_string(),
                file_size: 1234,
                url: "/uploads/x.pdf".to_string(),
            },
        )
        .await
        .unwrap();

    let listed = db.documents.list(OwnerScope::live(owner)).await.unwrap();
    assert_eq!(listed, vec![doc.clone()]);

    assert!(db
        .documents
        .soft_delete(new_user(&db).await, doc.id)
        .await
        .unwrap()
        .is_none());
    assert!(db.documents.soft_delete(owner, doc.id).await.unwrap().is_some());
    assert!(db.documents.list(OwnerScope::live(owner)).await.unwrap().is_empty());
}
