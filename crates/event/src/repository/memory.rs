//! In-process store behind one `tokio::sync::Mutex`.
//!
//! Every trait method runs start to finish under the lock and validates all
//! of its preconditions before mutating anything, which gives the same
//! all-or-nothing behaviour the Postgres repositories get from transactions
//! and conditional updates. State is lost on restart.

use crate::{
    abstract_trait::{
        event::repository::{EventCommandRepositoryTrait, EventQueryRepositoryTrait},
        feedback::FeedbackRepositoryTrait,
        organizer::OrganizerRepositoryTrait,
        registration::repository::{
            RegistrationCommandRepositoryTrait, RegistrationQueryRepositoryTrait,
        },
    },
    domain::{
        patch::EventPatch,
        requests::{
            event::{CreateEventRequest, EventFilter, NewMerchandiseItem},
            feedback::NewFeedback,
            registration::{NewRegistration, PaymentReview, RegistrationFilter, TicketGrant},
        },
    },
    model::{
        event::{Event, EventStatus, MerchandiseItem},
        feedback::Feedback,
        organizer::OrganizerSettings,
        registration::{
            PaymentStatus, Registration, RegistrationStats, RegistrationStatus, quantities_by_item,
        },
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::{FEEDBACK_UNIQUE_CONSTRAINT, REGISTRATION_UNIQUE_CONSTRAINT, RepositoryError};
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Default)]
struct MemoryState {
    events: BTreeMap<i32, Event>,
    registrations: BTreeMap<i32, Registration>,
    webhooks: HashMap<i32, OrganizerSettings>,
    feedback: BTreeMap<i32, Feedback>,
    next_event_id: i32,
    next_item_id: i32,
    next_registration_id: i32,
    next_feedback_id: i32,
}

impl MemoryState {
    fn build_items(&mut self, event_id: i32, items: &[NewMerchandiseItem]) -> Vec<MerchandiseItem> {
        items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                self.next_item_id += 1;
                MerchandiseItem {
                    item_id: self.next_item_id,
                    event_id,
                    name: item.name.clone(),
                    price: item.price,
                    stock: item.stock,
                    purchase_limit: item.purchase_limit,
                    variants: item.variants.clone(),
                    position: position as i32,
                }
            })
            .collect()
    }

    fn event_mut(&mut self, event_id: i32) -> Result<&mut Event, RepositoryError> {
        self.events
            .get_mut(&event_id)
            .ok_or(RepositoryError::NotFound)
    }

    fn registration(&self, registration_id: i32) -> Result<&Registration, RepositoryError> {
        self.registrations
            .get(&registration_id)
            .ok_or(RepositoryError::NotFound)
    }

    fn ensure_stock(
        &self,
        event_id: i32,
        quantities: &BTreeMap<i32, i32>,
    ) -> Result<(), RepositoryError> {
        let event = self.events.get(&event_id).ok_or(RepositoryError::NotFound)?;
        for (&item_id, &quantity) in quantities {
            match event.item(item_id) {
                Some(item) if item.stock >= quantity => {}
                _ => return Err(RepositoryError::InsufficientStock(item_id)),
            }
        }
        Ok(())
    }

    fn move_stock(&mut self, event_id: i32, quantities: &BTreeMap<i32, i32>, sign: i32) {
        if let Some(event) = self.events.get_mut(&event_id) {
            for item in &mut event.items {
                if let Some(quantity) = quantities.get(&item.item_id) {
                    item.stock += sign * quantity;
                }
            }
        }
    }

    fn adjust_counters(&mut self, event_id: i32, seats: i32, revenue: i64) {
        if let Some(event) = self.events.get_mut(&event_id) {
            event.registration_count = (event.registration_count + seats).max(0);
            event.total_revenue += revenue;
            event.updated_at = Utc::now();
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(event: &Event, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    event.name.to_lowercase().contains(&needle)
        || event.description.to_lowercase().contains(&needle)
        || event
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

fn paginate<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl EventQueryRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, event_id: i32) -> Result<Option<Event>, RepositoryError> {
        Ok(self.state.lock().await.events.get(&event_id).cloned())
    }

    async fn find_all(&self, filter: &EventFilter) -> Result<(Vec<Event>, i64), RepositoryError> {
        let state = self.state.lock().await;
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut matched: Vec<Event> = state
            .events
            .values()
            .filter(|e| search.is_none_or(|needle| matches_search(e, needle)))
            .filter(|e| filter.kind.is_none_or(|kind| e.kind == kind))
            .filter(|e| filter.eligibility.is_none_or(|el| e.eligibility == el))
            .filter(|e| filter.statuses.is_empty() || filter.statuses.contains(&e.status))
            .filter(|e| filter.organizer_id.is_none_or(|id| e.organizer_id == id))
            .filter(|e| filter.starts_after.is_none_or(|from| e.start_time >= from))
            .filter(|e| filter.starts_before.is_none_or(|to| e.start_time <= to))
            .cloned()
            .collect();
        matched.sort_by_key(|e| (e.start_time, e.event_id));

        if let Some(since) = filter.trending_since {
            let mut recent: HashMap<i32, usize> = HashMap::new();
            for registration in state.registrations.values() {
                if registration.created_at >= since {
                    *recent.entry(registration.event_id).or_default() += 1;
                }
            }
            // stable sort keeps start time order among ties
            matched.sort_by_key(|e| {
                (
                    Reverse(recent.get(&e.event_id).copied().unwrap_or(0)),
                    Reverse(e.registration_count),
                )
            });
        }

        let total = matched.len() as i64;
        let (limit, offset) = filter.limit_offset();
        Ok((paginate(matched, limit, offset), total))
    }
}

#[async_trait]
impl EventCommandRepositoryTrait for MemoryStore {
    async fn create_event(
        &self,
        organizer_id: i32,
        req: &CreateEventRequest,
    ) -> Result<Event, RepositoryError> {
        let mut state = self.state.lock().await;
        state.next_event_id += 1;
        let event_id = state.next_event_id;
        let now = Utc::now();

        let event = Event {
            event_id,
            organizer_id,
            name: req.name.clone(),
            description: req.description.clone(),
            kind: req.kind,
            eligibility: req.eligibility,
            registration_deadline: req.registration_deadline,
            start_time: req.start_time,
            end_time: req.end_time,
            registration_limit: req.registration_limit,
            registration_fee: req.registration_fee,
            status: EventStatus::Draft,
            registration_count: 0,
            total_revenue: 0,
            tags: req.tags.clone(),
            form_fields: req.form_fields.clone(),
            discussion_enabled: req.discussion_enabled,
            items: state.build_items(event_id, &req.items),
            created_at: now,
            updated_at: now,
        };

        state.events.insert(event_id, event.clone());
        info!("✅ Created event ID {} for organizer {}", event_id, organizer_id);
        Ok(event)
    }

    async fn update_event(
        &self,
        event_id: i32,
        expected_status: EventStatus,
        patch: &EventPatch,
    ) -> Result<Event, RepositoryError> {
        let mut state = self.state.lock().await;

        let current = state.events.get(&event_id).ok_or(RepositoryError::NotFound)?;
        if current.status != expected_status {
            return Err(RepositoryError::Conflict(
                "Event status changed concurrently".into(),
            ));
        }
        if let Some(limit) = patch.registration_limit {
            if limit != 0 && limit < current.registration_count {
                return Err(RepositoryError::Conflict(format!(
                    "registration_limit {limit} is below the {} admitted participants",
                    current.registration_count
                )));
            }
        }

        let new_items = patch
            .items
            .as_ref()
            .map(|items| state.build_items(event_id, items));

        let event = state.event_mut(event_id)?;
        patch.apply_to(event);
        if let Some(items) = new_items {
            event.items = items;
        }
        event.updated_at = Utc::now();

        Ok(event.clone())
    }
}

#[async_trait]
impl RegistrationQueryRepositoryTrait for MemoryStore {
    async fn find_by_id(
        &self,
        registration_id: i32,
    ) -> Result<Option<Registration>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .registrations
            .get(&registration_id)
            .cloned())
    }

    async fn find_by_participant_and_event(
        &self,
        participant_id: i32,
        event_id: i32,
    ) -> Result<Option<Registration>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .registrations
            .values()
            .find(|r| r.participant_id == participant_id && r.event_id == event_id)
            .cloned())
    }

    async fn find_by_ticket(
        &self,
        event_id: i32,
        ticket_id: &str,
    ) -> Result<Option<Registration>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .registrations
            .values()
            .find(|r| r.event_id == event_id && r.ticket_id.as_deref() == Some(ticket_id))
            .cloned())
    }

    async fn find_by_event(
        &self,
        filter: &RegistrationFilter,
    ) -> Result<(Vec<Registration>, i64), RepositoryError> {
        let state = self.state.lock().await;
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<Registration> = state
            .registrations
            .values()
            .filter(|r| r.event_id == filter.event_id)
            .filter(|r| filter.status.is_none_or(|status| r.status == status))
            .filter(|r| {
                search.as_deref().is_none_or(|needle| {
                    r.participant_name.to_lowercase().contains(needle)
                        || r.participant_email.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            (b.created_at, b.registration_id).cmp(&(a.created_at, a.registration_id))
        });

        let total = matched.len() as i64;
        let (limit, offset) = filter.limit_offset();
        Ok((paginate(matched, limit, offset), total))
    }

    async fn find_by_participant(
        &self,
        participant_id: i32,
    ) -> Result<Vec<Registration>, RepositoryError> {
        let state = self.state.lock().await;
        let mut found: Vec<Registration> = state
            .registrations
            .values()
            .filter(|r| r.participant_id == participant_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (b.created_at, b.registration_id).cmp(&(a.created_at, a.registration_id))
        });
        Ok(found)
    }

    async fn find_attendees(&self, event_id: i32) -> Result<Vec<Registration>, RepositoryError> {
        let state = self.state.lock().await;
        let mut attendees: Vec<Registration> = state
            .registrations
            .values()
            .filter(|r| r.event_id == event_id && r.attended)
            .cloned()
            .collect();
        attendees.sort_by(|a, b| {
            (b.attended_at, b.registration_id).cmp(&(a.attended_at, a.registration_id))
        });
        Ok(attendees)
    }

    async fn aggregate_stats(&self, event_id: i32) -> Result<RegistrationStats, RepositoryError> {
        let state = self.state.lock().await;
        let mut stats = RegistrationStats::default();

        for registration in state.registrations.values().filter(|r| r.event_id == event_id) {
            stats.accumulate(
                registration.status,
                1,
                i64::from(registration.attended),
                registration.total_amount,
            );
        }

        Ok(stats)
    }
}

#[async_trait]
impl RegistrationCommandRepositoryTrait for MemoryStore {
    async fn admit(&self, record: &NewRegistration) -> Result<Registration, RepositoryError> {
        let mut state = self.state.lock().await;

        if state
            .registrations
            .values()
            .any(|r| r.participant_id == record.participant_id && r.event_id == record.event_id)
        {
            return Err(RepositoryError::AlreadyExists(
                REGISTRATION_UNIQUE_CONSTRAINT.to_string(),
            ));
        }
        if let Some(ticket) = &record.ticket {
            if state
                .registrations
                .values()
                .any(|r| r.ticket_id.as_deref() == Some(ticket.ticket_id.as_str()))
            {
                return Err(RepositoryError::AlreadyExists(
                    "registrations_ticket_id_key".to_string(),
                ));
            }
        }

        let event = state
            .events
            .get(&record.event_id)
            .ok_or(RepositoryError::NotFound)?;
        if !event.status.accepts_registrations() {
            return Err(RepositoryError::EventNotOpen);
        }
        if !event.has_capacity() {
            return Err(RepositoryError::CapacityExceeded);
        }

        let confirmed = record.status.is_confirmed();
        let quantities = quantities_by_item(&record.selections);
        if confirmed {
            state.ensure_stock(record.event_id, &quantities)?;
            state.move_stock(record.event_id, &quantities, -1);
        }
        state.adjust_counters(
            record.event_id,
            1,
            if confirmed { record.total_amount } else { 0 },
        );

        state.next_registration_id += 1;
        let now = Utc::now();
        let registration = Registration {
            registration_id: state.next_registration_id,
            event_id: record.event_id,
            participant_id: record.participant_id,
            participant_name: record.participant_name.clone(),
            participant_email: record.participant_email.clone(),
            status: record.status,
            payment_status: record.payment_status,
            form_responses: record.form_responses.clone(),
            selections: record.selections.clone(),
            payment_proof: record.payment_proof.clone(),
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
            ticket_id: record.ticket.as_ref().map(|t| t.ticket_id.clone()),
            ticket_credential: record.ticket.as_ref().map(|t| t.credential.clone()),
            attended: false,
            attended_at: None,
            attendance_marked_by: None,
            total_amount: record.total_amount,
            created_at: now,
            updated_at: now,
        };

        state
            .registrations
            .insert(registration.registration_id, registration.clone());
        Ok(registration)
    }

    async fn approve_payment(
        &self,
        review: &PaymentReview,
        ticket: &TicketGrant,
    ) -> Result<Registration, RepositoryError> {
        let mut state = self.state.lock().await;

        let current = state.registration(review.registration_id)?;
        if current.status != RegistrationStatus::PendingPayment
            || current.payment_status != PaymentStatus::Pending
        {
            return Err(RepositoryError::AlreadyReviewed);
        }
        if current.ticket_id.is_some() {
            return Err(RepositoryError::Conflict("Ticket already issued".into()));
        }
        if state
            .registrations
            .values()
            .any(|r| r.ticket_id.as_deref() == Some(ticket.ticket_id.as_str()))
        {
            return Err(RepositoryError::AlreadyExists(
                "registrations_ticket_id_key".to_string(),
            ));
        }

        let event_id = current.event_id;
        let amount = current.total_amount;
        let quantities = quantities_by_item(&current.selections);

        state.ensure_stock(event_id, &quantities)?;
        state.move_stock(event_id, &quantities, -1);
        state.adjust_counters(event_id, 0, amount);

        let registration = state
            .registrations
            .get_mut(&review.registration_id)
            .ok_or(RepositoryError::NotFound)?;
        registration.status = RegistrationStatus::Approved;
        registration.payment_status = PaymentStatus::Approved;
        registration.reviewed_by = Some(review.reviewer_id);
        registration.reviewed_at = Some(review.reviewed_at);
        registration.review_comment = review.comment.clone();
        registration.ticket_id = Some(ticket.ticket_id.clone());
        registration.ticket_credential = Some(ticket.credential.clone());
        registration.updated_at = Utc::now();

        Ok(registration.clone())
    }

    async fn reject_payment(&self, review: &PaymentReview) -> Result<Registration, RepositoryError> {
        let mut state = self.state.lock().await;

        let current = state.registration(review.registration_id)?;
        if current.status != RegistrationStatus::PendingPayment
            || current.payment_status != PaymentStatus::Pending
        {
            return Err(RepositoryError::AlreadyReviewed);
        }
        let event_id = current.event_id;

        state.adjust_counters(event_id, -1, 0);

        let registration = state
            .registrations
            .get_mut(&review.registration_id)
            .ok_or(RepositoryError::NotFound)?;
        registration.status = RegistrationStatus::Rejected;
        registration.payment_status = PaymentStatus::Rejected;
        registration.reviewed_by = Some(review.reviewer_id);
        registration.reviewed_at = Some(review.reviewed_at);
        registration.review_comment = review.comment.clone();
        registration.updated_at = Utc::now();

        Ok(registration.clone())
    }

    async fn attach_payment_proof(
        &self,
        registration_id: i32,
        payment_proof: &str,
    ) -> Result<Registration, RepositoryError> {
        let mut state = self.state.lock().await;

        let registration = state
            .registrations
            .get_mut(&registration_id)
            .ok_or(RepositoryError::NotFound)?;
        if registration.payment_status != PaymentStatus::Pending {
            return Err(RepositoryError::AlreadyReviewed);
        }

        registration.payment_proof = Some(payment_proof.to_string());
        registration.updated_at = Utc::now();
        Ok(registration.clone())
    }

    async fn mark_attended(
        &self,
        registration_id: i32,
        marked_by: i32,
        at: DateTime<Utc>,
    ) -> Result<Registration, RepositoryError> {
        let mut state = self.state.lock().await;

        let registration = state
            .registrations
            .get_mut(&registration_id)
            .ok_or(RepositoryError::NotFound)?;
        if registration.attended {
            return Err(RepositoryError::AlreadyMarked(
                registration.attended_at.unwrap_or(at),
            ));
        }
        if !registration.status.is_confirmed() {
            return Err(RepositoryError::NotConfirmed);
        }

        registration.attended = true;
        registration.attended_at = Some(at);
        registration.attendance_marked_by = Some(marked_by);
        registration.updated_at = Utc::now();
        Ok(registration.clone())
    }

    async fn cancel(&self, registration_id: i32) -> Result<Registration, RepositoryError> {
        let mut state = self.state.lock().await;

        let current = state.registration(registration_id)?;
        if current.attended {
            return Err(RepositoryError::AlreadyMarked(
                current.attended_at.unwrap_or(current.updated_at),
            ));
        }
        if !current.status.is_cancellable() {
            return Err(RepositoryError::Conflict(format!(
                "Registration is already {}",
                current.status
            )));
        }

        let event_id = current.event_id;
        let confirmed = current.status.is_confirmed();
        let amount = current.total_amount;
        let quantities = quantities_by_item(&current.selections);

        if confirmed {
            state.move_stock(event_id, &quantities, 1);
            state.adjust_counters(event_id, -1, -amount);
        } else {
            state.adjust_counters(event_id, -1, 0);
        }

        let registration = state
            .registrations
            .get_mut(&registration_id)
            .ok_or(RepositoryError::NotFound)?;
        registration.status = RegistrationStatus::Cancelled;
        registration.updated_at = Utc::now();
        Ok(registration.clone())
    }
}

#[async_trait]
impl OrganizerRepositoryTrait for MemoryStore {
    async fn find_webhook(&self, organizer_id: i32) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .webhooks
            .get(&organizer_id)
            .and_then(|settings| settings.webhook_url.clone()))
    }

    async fn upsert_webhook(
        &self,
        organizer_id: i32,
        webhook_url: Option<&str>,
    ) -> Result<OrganizerSettings, RepositoryError> {
        let settings = OrganizerSettings {
            organizer_id,
            webhook_url: webhook_url.map(str::to_string),
            updated_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .webhooks
            .insert(organizer_id, settings.clone());
        Ok(settings)
    }
}

#[async_trait]
impl FeedbackRepositoryTrait for MemoryStore {
    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback, RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.events.contains_key(&feedback.event_id) {
            return Err(RepositoryError::ForeignKey("event_feedback_event_id_fkey".into()));
        }
        if state.feedback.values().any(|f| {
            f.event_id == feedback.event_id && f.participant_id == feedback.participant_id
        }) {
            return Err(RepositoryError::AlreadyExists(
                FEEDBACK_UNIQUE_CONSTRAINT.into(),
            ));
        }

        state.next_feedback_id += 1;
        let created = Feedback {
            feedback_id: state.next_feedback_id,
            event_id: feedback.event_id,
            participant_id: feedback.participant_id,
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            created_at: Utc::now(),
        };
        state.feedback.insert(created.feedback_id, created.clone());

        info!(
            "⭐ Feedback {} stored for event {}",
            created.feedback_id, created.event_id
        );
        Ok(created)
    }

    async fn find_by_event(
        &self,
        event_id: i32,
        rating: Option<i32>,
    ) -> Result<Vec<Feedback>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .feedback
            .values()
            .rev()
            .filter(|f| f.event_id == event_id)
            .filter(|f| rating.is_none_or(|r| f.rating == r))
            .cloned()
            .collect())
    }

    async fn rating_counts(&self, event_id: i32) -> Result<Vec<(i32, i64)>, RepositoryError> {
        let state = self.state.lock().await;
        let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
        for feedback in state.feedback.values().filter(|f| f.event_id == event_id) {
            *counts.entry(feedback.rating).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
