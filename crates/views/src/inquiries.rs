//! Agent inquiry inbox.

use tokio::sync::watch;
use tracing::{debug, info};

use propconnect_client::{Inquiry, InquiryReply, InquiryStatus, InquiryThread, PrincipalKind};
use propconnect_store::{OptimisticUpdate, Severity, Store};

use crate::access::token_for;
use crate::error::{ViewError, ViewResult};
use crate::validation::require;

#[derive(Debug)]
pub struct InquiriesView {
    store: Store,
    inquiries: watch::Sender<Vec<Inquiry>>,
    filter: Option<InquiryStatus>,
    thread: Option<InquiryThread>,
}

impl InquiriesView {
    pub fn new(store: &Store) -> ViewResult<Self> {
        token_for(store, PrincipalKind::Agent)?;
        let (inquiries, _) = watch::channel(Vec::new());
        Ok(Self {
            store: store.clone(),
            inquiries,
            filter: None,
            thread: None,
        })
    }

    pub async fn load(&mut self, filter: Option<InquiryStatus>) -> ViewResult<Vec<Inquiry>> {
        let token = token_for(&self.store, PrincipalKind::Agent)?;
        let inquiries = self.store.client().agent_inquiries(&token, filter).await?;
        debug!(count = inquiries.len(), ?filter, "inquiries loaded");

        self.filter = filter;
        self.inquiries.send_replace(inquiries.clone());
        Ok(inquiries)
    }

    pub fn inquiries(&self) -> Vec<Inquiry> {
        self.inquiries.borrow().clone()
    }

    pub fn filter(&self) -> Option<InquiryStatus> {
        self.filter
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Inquiry>> {
        self.inquiries.subscribe()
    }

    pub fn unread(&self) -> Vec<Inquiry> {
        self.inquiries
            .borrow()
            .iter()
            .filter(|inquiry| inquiry.is_unread())
            .cloned()
            .collect()
    }

    pub fn thread(&self) -> Option<&InquiryThread> {
        self.thread.as_ref()
    }

    /// Load a thread. Opening an unread inquiry marks it read, adjusting the
    /// dashboard counter and the inbox before the backend confirms.
    pub async fn open(&mut self, inquiry_id: &str) -> ViewResult<&InquiryThread> {
        let token = token_for(&self.store, PrincipalKind::Agent)?;
        let mut thread = self.store.client().inquiry_thread(&token, inquiry_id).await?;

        if thread.inquiry.is_unread() {
            let counter = OptimisticUpdate::capture(self.store.dashboard_slot());
            let inbox = OptimisticUpdate::capture(&self.inquiries);
            counter.apply(|counters| {
                counters.unread_inquiry_count = counters.unread_inquiry_count.saturating_sub(1)
            });
            inbox.apply(|inquiries| set_status(inquiries, inquiry_id, InquiryStatus::Read));

            match self.store.client().mark_inquiry_read(&token, inquiry_id).await {
                Ok(updated) => {
                    let mut merged = self.inquiries.borrow().clone();
                    replace(&mut merged, &updated);
                    inbox.commit(merged);
                    counter.keep();
                    thread.inquiry = updated;
                }
                Err(error) => {
                    inbox.rollback();
                    counter.rollback();
                    self.store.notify(
                        format!("Could not mark inquiry as read: {}", error.user_message()),
                        Severity::Error,
                    );
                    return Err(error.into());
                }
            }
        }

        let opened = self.thread.insert(thread);
        Ok(&*opened)
    }

    pub async fn reply(&mut self, inquiry_id: &str, message: &str) -> ViewResult<InquiryReply> {
        let token = token_for(&self.store, PrincipalKind::Agent)?;
        if let Err(problem) = require(message, "Reply") {
            return Err(ViewError::field("message", problem));
        }

        let reply = match self
            .store
            .client()
            .reply_to_inquiry(&token, inquiry_id, message.trim())
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                self.store.notify(
                    format!("Could not send reply: {}", error.user_message()),
                    Severity::Error,
                );
                return Err(error.into());
            }
        };
        info!(inquiry_id, "reply sent");

        if let Some(thread) = self.thread.as_mut().filter(|thread| thread.inquiry.id == inquiry_id) {
            thread.inquiry.status = InquiryStatus::Replied;
            thread.replies.push(reply.clone());
        }
        self.inquiries
            .send_modify(|inquiries| set_status(inquiries, inquiry_id, InquiryStatus::Replied));
        self.store.notify("Reply sent", Severity::Success);
        Ok(reply)
    }
}

fn set_status(inquiries: &mut [Inquiry], inquiry_id: &str, status: InquiryStatus) {
    if let Some(inquiry) = inquiries.iter_mut().find(|inquiry| inquiry.id == inquiry_id) {
        inquiry.status = status;
    }
}

fn replace(inquiries: &mut [Inquiry], updated: &Inquiry) {
    if let Some(inquiry) = inquiries.iter_mut().find(|inquiry| inquiry.id == updated.id) {
        *inquiry = updated.clone();
    }
}
