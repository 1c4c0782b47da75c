//! Prospect inquiries and the agent inbox.

use reqwest::Method;

use crate::client::{route, ApiClient};
use crate::entities::{Inquiry, InquiryReply, InquiryStatus, InquiryThread, NewInquiry};
use crate::error::ApiResult;
use crate::types::{InquiriesEnvelope, InquiryEnvelope, InquiryFilter, ReplyEnvelope, ReplyRequest};

const INQUIRIES_ROUTE: &str = "/api/inquiries";
const AGENT_INQUIRIES_ROUTE: &str = "/api/inquiries/agent";

impl ApiClient {
    /// Guests may inquire anonymously; a seeker token links the inquiry to the account.
    pub async fn create_inquiry(&self, token: Option<&str>, inquiry: &NewInquiry) -> ApiResult<Inquiry> {
        let request = self
            .request(Method::POST, &route(INQUIRIES_ROUTE), token)?
            .json(inquiry);
        let envelope: InquiryEnvelope = self.fetch_json(request).await?;
        Ok(envelope.inquiry)
    }

    pub async fn agent_inquiries(
        &self,
        token: &str,
        status: Option<InquiryStatus>,
    ) -> ApiResult<Vec<Inquiry>> {
        let filter = InquiryFilter {
            status: status.map(InquiryStatus::as_str),
        };
        let request = self
            .request(Method::GET, &route(AGENT_INQUIRIES_ROUTE), Some(token))?
            .query(&filter);
        let envelope: InquiriesEnvelope = self.fetch_json(request).await?;
        Ok(envelope.inquiries)
    }

    pub async fn inquiry_thread(&self, token: &str, inquiry_id: &str) -> ApiResult<InquiryThread> {
        let request = self.request(Method::GET, &["api", "inquiries", inquiry_id], Some(token))?;
        self.fetch_json(request).await
    }

    pub async fn mark_inquiry_read(&self, token: &str, inquiry_id: &str) -> ApiResult<Inquiry> {
        let request = self.request(Method::PUT, &["api", "inquiries", inquiry_id, "read"], Some(token))?;
        let envelope: InquiryEnvelope = self.fetch_json(request).await?;
        Ok(envelope.inquiry)
    }

    pub async fn reply_to_inquiry(
        &self,
        token: &str,
        inquiry_id: &str,
        message: &str,
    ) -> ApiResult<InquiryReply> {
        let request = self
            .request(Method::POST, &["api", "inquiries", inquiry_id, "replies"], Some(token))?
            .json(&ReplyRequest { message });
        let envelope: ReplyEnvelope = self.fetch_json(request).await?;
        Ok(envelope.reply)
    }
}
