//! Integration tests for `SqliteStore` against an in-memory database.

use destiny_core::{
  BirthDate,
  entitlement::{NewPayment, NewSubscription, PaymentKind, PaymentStatus, SubscriptionStatus},
  interpretation::{NewQuestion, QuestionDenial},
  record::{Gender, NewMatrix},
  store::MatrixStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_matrix(user_id: Option<Uuid>, date: &str) -> NewMatrix {
  NewMatrix {
    user_id,
    name: "Ada".into(),
    birth_date: BirthDate::parse_checked(date).unwrap(),
    gender: Gender::Female,
  }
}

fn full_unlock(matrix_id: Uuid, status: PaymentStatus) -> NewPayment {
  NewPayment {
    user_id: None,
    matrix_id: Some(matrix_id),
    kind: PaymentKind::FullUnlock,
    amount_cents: 799,
    currency: "eur".into(),
    provider_reference: Some("pi_123".into()),
    status,
  }
}

fn question_payment(user_id: Uuid) -> NewPayment {
  NewPayment {
    user_id: Some(user_id),
    matrix_id: None,
    kind: PaymentKind::SingleQuestion,
    amount_cents: 400,
    currency: "EUR".into(),
    provider_reference: None,
    status: PaymentStatus::Completed,
  }
}

fn subscription(user_id: Uuid) -> NewSubscription {
  NewSubscription {
    user_id,
    provider_subscription_id: Some("sub_1".into()),
    provider_customer_id: Some("cus_1".into()),
    status: SubscriptionStatus::Active,
    current_period_end: None,
  }
}

// ─── Matrices ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_matrix() {
  let s = store().await;

  let saved = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  assert_eq!(saved.calculation.destiny.get(), 10);

  let fetched = s.get_matrix(saved.matrix_id).await.unwrap().unwrap();
  assert_eq!(fetched.matrix_id, saved.matrix_id);
  assert_eq!(fetched.name, "Ada");
  assert_eq!(fetched.birth_date, BirthDate::new(15, 3, 1990));
  assert_eq!(fetched.gender, Gender::Female);
  assert_eq!(fetched.calculation, saved.calculation);
  assert!(fetched.user_id.is_none());
}

#[tokio::test]
async fn get_matrix_missing_returns_none() {
  let s = store().await;
  assert!(s.get_matrix(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_user_matrices_filters_by_user() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let first = s.save_matrix(new_matrix(Some(alice), "01.01.1980")).await.unwrap();
  let second = s.save_matrix(new_matrix(Some(alice), "02.02.1990")).await.unwrap();
  s.save_matrix(new_matrix(Some(bob), "03.03.2000")).await.unwrap();
  s.save_matrix(new_matrix(None, "04.04.2010")).await.unwrap();

  let mine = s.list_user_matrices(alice).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert_eq!(mine[0].matrix_id, first.matrix_id);
  assert_eq!(mine[1].matrix_id, second.matrix_id);
}

// ─── Payments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_payment_normalises_currency() {
  let s = store().await;
  let m = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();

  let p = s
    .record_payment(full_unlock(m.matrix_id, PaymentStatus::Pending))
    .await
    .unwrap();
  assert_eq!(p.currency, "EUR");

  let fetched = s.get_payment(p.payment_id).await.unwrap().unwrap();
  assert_eq!(fetched.kind, PaymentKind::FullUnlock);
  assert_eq!(fetched.amount_cents, 799);
  assert_eq!(fetched.provider_reference.as_deref(), Some("pi_123"));
  assert_eq!(fetched.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn record_payment_for_unknown_matrix_errors() {
  let s = store().await;
  let err = s
    .record_payment(full_unlock(Uuid::new_v4(), PaymentStatus::Completed))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MatrixNotFound(_)));
}

#[tokio::test]
async fn set_payment_status_updates_and_reports_missing() {
  let s = store().await;
  let m = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  let p = s
    .record_payment(full_unlock(m.matrix_id, PaymentStatus::Pending))
    .await
    .unwrap();

  let updated = s
    .set_payment_status(p.payment_id, PaymentStatus::Completed)
    .await
    .unwrap();
  assert_eq!(updated.status, PaymentStatus::Completed);

  let err = s
    .set_payment_status(Uuid::new_v4(), PaymentStatus::Failed)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PaymentNotFound(_)));
  assert!(err.is_not_found());
}

// ─── Entitlement ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_matrix_is_locked() {
  let s = store().await;
  let m = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  assert!(!s.has_full_unlock(m.matrix_id, None).await.unwrap());
  assert!(!s.has_full_unlock(m.matrix_id, Some(Uuid::new_v4())).await.unwrap());
}

#[tokio::test]
async fn completed_full_unlock_unlocks_for_everyone() {
  let s = store().await;
  let m = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  let p = s
    .record_payment(full_unlock(m.matrix_id, PaymentStatus::Pending))
    .await
    .unwrap();
  assert!(!s.has_full_unlock(m.matrix_id, None).await.unwrap());

  s.set_payment_status(p.payment_id, PaymentStatus::Completed)
    .await
    .unwrap();
  assert!(s.has_full_unlock(m.matrix_id, None).await.unwrap());
  assert!(s.has_full_unlock(m.matrix_id, Some(Uuid::new_v4())).await.unwrap());
}

#[tokio::test]
async fn unlock_is_per_matrix() {
  let s = store().await;
  let a = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  let b = s.save_matrix(new_matrix(None, "16.03.1990")).await.unwrap();
  s.record_payment(full_unlock(a.matrix_id, PaymentStatus::Completed))
    .await
    .unwrap();

  assert!(s.has_full_unlock(a.matrix_id, None).await.unwrap());
  assert!(!s.has_full_unlock(b.matrix_id, None).await.unwrap());
}

#[tokio::test]
async fn active_subscription_unlocks_every_matrix_for_holder() {
  let s = store().await;
  let user = Uuid::new_v4();
  let m = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  let sub = s.record_subscription(subscription(user)).await.unwrap();

  assert!(s.has_full_unlock(m.matrix_id, Some(user)).await.unwrap());
  assert!(!s.has_full_unlock(m.matrix_id, Some(Uuid::new_v4())).await.unwrap());
  assert!(!s.has_full_unlock(m.matrix_id, None).await.unwrap());

  let canceled = s
    .set_subscription_status(sub.subscription_id, SubscriptionStatus::Canceled)
    .await
    .unwrap();
  assert_eq!(canceled.status, SubscriptionStatus::Canceled);
  assert!(canceled.updated_at >= sub.updated_at);
  assert!(s.active_subscription(user).await.unwrap().is_none());
  assert!(!s.has_full_unlock(m.matrix_id, Some(user)).await.unwrap());
}

#[tokio::test]
async fn set_subscription_status_missing_errors() {
  let s = store().await;
  let err = s
    .set_subscription_status(Uuid::new_v4(), SubscriptionStatus::PastDue)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubscriptionNotFound(_)));
}

// ─── Interpretations ─────────────────────────────────────────────────────────

#[tokio::test]
async fn attach_interpretation_replaces_previous() {
  let s = store().await;
  let m = s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap();
  assert!(s.get_interpretation(m.matrix_id).await.unwrap().is_none());

  s.attach_interpretation(m.matrix_id, "first".into()).await.unwrap();
  s.attach_interpretation(m.matrix_id, "second".into()).await.unwrap();

  let i = s.get_interpretation(m.matrix_id).await.unwrap().unwrap();
  assert_eq!(i.text, "second");
  assert_eq!(i.matrix_id, m.matrix_id);
}

#[tokio::test]
async fn attach_interpretation_unknown_matrix_errors() {
  let s = store().await;
  let err = s
    .attach_interpretation(Uuid::new_v4(), "text".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MatrixNotFound(_)));
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_answer_and_list_questions() {
  let s = store().await;
  let user = Uuid::new_v4();
  let other = Uuid::new_v4();
  let m = s.save_matrix(new_matrix(Some(user), "15.03.1990")).await.unwrap();

  let q = s
    .record_question(NewQuestion {
      matrix_id:  m.matrix_id,
      user_id:    user,
      question:   "Career?".into(),
      payment_id: None,
    })
    .await
    .unwrap()
    .unwrap();
  assert!(q.answer.is_none());

  s.record_question(NewQuestion {
    matrix_id:  m.matrix_id,
    user_id:    other,
    question:   "Love?".into(),
    payment_id: None,
  })
  .await
  .unwrap()
  .unwrap();

  let answered = s.answer_question(q.question_id, "Yes.".into()).await.unwrap();
  assert_eq!(answered.answer.as_deref(), Some("Yes."));

  let mine = s.list_questions(m.matrix_id, Some(user)).await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].answer.as_deref(), Some("Yes."));

  let all = s.list_questions(m.matrix_id, None).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn question_payment_is_single_use() {
  let s = store().await;
  let user = Uuid::new_v4();
  let m = s.save_matrix(new_matrix(Some(user), "15.03.1990")).await.unwrap();
  let p = s.record_payment(question_payment(user)).await.unwrap();
  assert!(!s.payment_used(p.payment_id).await.unwrap());

  let ask = |text: &str| NewQuestion {
    matrix_id:  m.matrix_id,
    user_id:    user,
    question:   text.into(),
    payment_id: Some(p.payment_id),
  };

  s.record_question(ask("first")).await.unwrap().unwrap();
  assert!(s.payment_used(p.payment_id).await.unwrap());

  let denied = s.record_question(ask("second")).await.unwrap();
  assert_eq!(denied.unwrap_err(), QuestionDenial::PaymentAlreadyUsed);
  assert_eq!(s.list_questions(m.matrix_id, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn question_for_unknown_matrix_errors() {
  let s = store().await;
  let err = s
    .record_question(NewQuestion {
      matrix_id:  Uuid::new_v4(),
      user_id:    Uuid::new_v4(),
      question:   "?".into(),
      payment_id: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MatrixNotFound(_)));
}

#[tokio::test]
async fn answer_unknown_question_errors() {
  let s = store().await;
  let err = s
    .answer_question(Uuid::new_v4(), "nope".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::QuestionNotFound(_)));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_survives_reopen() {
  let path = std::env::temp_dir().join(format!("destiny-{}.db", Uuid::new_v4()));

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.save_matrix(new_matrix(None, "15.03.1990")).await.unwrap().matrix_id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let m = s.get_matrix(id).await.unwrap().unwrap();
  assert_eq!(m.calculation.money.get(), 22);

  drop(s);
  let _ = std::fs::remove_file(&path);
}
