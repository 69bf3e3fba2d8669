use chrono::{Duration, NaiveDate};
use exam_core::model::{
    ExamDraft, ExamId, ExamRecord, FlashcardDraft, FlashcardId, FlashcardSet, FlashcardSetId,
    Intensity, Mood, PointsReason, ReminderDraft, ReminderId, UserProfile,
};
use exam_core::postpone::snooze;
use exam_core::time::fixed_now;
use storage::repository::{
    BlobStore, EXAMS_KEY, ExamRepository, FlashcardRepository, ProfileRepository,
    ReminderRepository, Storage,
};
use storage::sqlite::SqliteRepository;

fn build_exam(id: u64, subject: &str) -> ExamRecord {
    ExamDraft {
        subject: subject.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        content: "Chapters 1-4".to_string(),
        intensity: Intensity::Medium,
    }
    .validate()
    .unwrap()
    .into_record(ExamId::new(id), 19)
}

#[tokio::test]
async fn sqlite_roundtrip_persists_plan_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut exam = build_exam(1, "Math");
    exam.session_mut(0).unwrap().mark_done();
    snooze(exam.session_mut(1).unwrap(), 30);
    repo.save_exams(&[exam.clone(), build_exam(2, "Bio")])
        .await
        .unwrap();

    let fetched = repo.load_exams().await.expect("fetch");
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0], exam);
    assert!(fetched[0].session(0).unwrap().done);
    assert_eq!(fetched[0].session(1).unwrap().postponed, 1);
    assert_eq!(fetched[1].subject(), "Bio");
}

#[tokio::test]
async fn sqlite_overwrites_blob_on_save() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_exams(&[build_exam(1, "Math"), build_exam(2, "Bio")])
        .await
        .unwrap();
    repo.save_exams(&[build_exam(3, "Chem")]).await.unwrap();

    let fetched = repo.load_exams().await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id(), ExamId::new(3));
}

#[tokio::test]
async fn sqlite_persists_reminders_and_profile() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_misc?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let reminder = ReminderDraft {
        title: "Pack calculator".into(),
        at: fixed_now() + Duration::hours(2),
        message: String::new(),
        voice: String::new(),
    }
    .validate(ReminderId::new(7))
    .unwrap();
    repo.save_reminders(std::slice::from_ref(&reminder))
        .await
        .unwrap();

    let mut profile = UserProfile::default();
    profile.set_mood(Some(Mood::Fresh));
    profile.award(PointsReason::ExamAdded);
    repo.save_profile(&profile).await.unwrap();

    assert_eq!(repo.load_reminders().await.unwrap(), vec![reminder]);
    let loaded = repo.load_profile().await.unwrap();
    assert_eq!(loaded.points(), 10);
    assert_eq!(loaded.mood(), Some(Mood::Fresh));
}

#[tokio::test]
async fn sqlite_corrupt_blob_loads_as_empty() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.write_blob(EXAMS_KEY, "[{\"id\":").await.unwrap();
    assert!(repo.load_exams().await.unwrap().is_empty());

    repo.delete_blob(EXAMS_KEY).await.unwrap();
    assert!(repo.read_blob(EXAMS_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_wires_every_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");

    storage
        .exams
        .save_exams(&[build_exam(9, "Physics")])
        .await
        .unwrap();
    let exams = storage.exams.load_exams().await.unwrap();
    assert_eq!(exams[0].id(), ExamId::new(9));
    assert!(storage.reminders.load_reminders().await.unwrap().is_empty());
    assert_eq!(
        storage.profile.load_profile().await.unwrap(),
        UserProfile::default()
    );
    assert!(storage.flashcards.load_flashcard_sets().await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_persists_flashcard_sets() {
    let repo = SqliteRepository::open("sqlite:file:memdb_flashcards?mode=memory&cache=shared")
        .await
        .expect("open");

    let card = FlashcardDraft {
        subject: "Chemistry".into(),
        topic: "Acids".into(),
        question: "pH of pure water?".into(),
        answer: "7".into(),
    }
    .validate()
    .unwrap();
    let mut set = FlashcardSet::new_for(FlashcardSetId::new(3), &card);
    set.push_card(FlashcardId::new(4), card);
    repo.save_flashcard_sets(std::slice::from_ref(&set))
        .await
        .unwrap();

    assert_eq!(repo.load_flashcard_sets().await.unwrap(), vec![set]);
    assert!(repo.load_reminders().await.unwrap().is_empty());
}
