//! Records served by the chatbot API and the enumerations used to query it
//!
//! Every record derives [`Validate`] so the HTTP client can reject payloads that
//! decode but break the invariants the screens rely on.

use crate::utils::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::{Validate, ValidationError};

/// Reporting window used to scope aggregate statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Since midnight
    #[default]
    Today,
    /// The current week
    Week,
    /// The current month
    Month,
}

impl Period {
    /// All periods in selector order
    pub const ALL: [Self; 3] = [Self::Today, Self::Week, Self::Month];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Label shown in the period selector
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This week",
            Self::Month => "This month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidValue {
                kind: "period",
                value: s.to_string(),
            })
    }
}

/// Field the lead list can be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Conversation creation time
    CreatedAt,
    /// Last modification
    #[default]
    UpdatedAt,
    /// Time of the most recent message
    LastMessageTime,
}

impl SortField {
    /// All sort fields in selector order
    pub const ALL: [Self; 3] = [Self::UpdatedAt, Self::CreatedAt, Self::LastMessageTime];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::LastMessageTime => "last_message_time",
        }
    }

    /// Label shown in the sort selector
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "Newest first",
            Self::UpdatedAt => "Recently updated",
            Self::LastMessageTime => "Latest message",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidValue {
                kind: "sort field",
                value: s.to_string(),
            })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(crate::Error::InvalidValue {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// Unanswered-time threshold selectable on the alerts screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertThreshold(u32);

impl AlertThreshold {
    /// Thresholds offered by the selector, in minutes
    pub const CHOICES: [u32; 4] = [5, 15, 30, 60];

    /// Accept only one of the offered thresholds
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::CHOICES.contains(&minutes).then_some(Self(minutes))
    }

    /// Threshold in minutes
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Label shown in the threshold selector
    #[must_use]
    pub fn label(self) -> String {
        if self.0 % 60 == 0 {
            format!("{}+ hour", self.0 / 60)
        } else {
            format!("{}+ min", self.0)
        }
    }

    /// Every selectable threshold
    pub fn all() -> impl Iterator<Item = Self> {
        Self::CHOICES.into_iter().map(Self)
    }
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self(15)
    }
}

impl fmt::Display for AlertThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AlertThreshold {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .ok()
            .and_then(Self::from_minutes)
            .ok_or_else(|| crate::Error::InvalidValue {
                kind: "alert threshold",
                value: s.to_string(),
            })
    }
}

/// Today's aggregate KPIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TodaySummary {
    /// Inquiries received today
    pub today_inquiries: u64,
    /// Inquiries received this week
    pub week_inquiries: u64,
    /// Average time to first answer
    #[validate(range(min = 0.0))]
    pub avg_response_time_seconds: f64,
    /// Conversations currently waiting for an answer
    pub unanswered_count: u64,
}

/// Inquiry count for one hour of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TimeDistributionItem {
    /// Hour of day, 0 to 23
    #[validate(range(max = 23))]
    pub hour: u32,
    /// Inquiries in that hour
    pub count: u64,
}

/// Statistics for a selected period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DashboardStats {
    /// Period the numbers cover
    pub period: Period,
    /// Total inquiries in the period
    pub inquiries: u64,
    /// Average time to first answer
    #[validate(range(min = 0.0))]
    pub avg_response_time_seconds: f64,
    /// Per-hour breakdown; hours without inquiries may be missing
    #[validate(nested)]
    pub time_distribution: Vec<TimeDistributionItem>,
}

impl DashboardStats {
    /// Per-hour counts for all 24 hours
    #[must_use]
    pub fn hourly(&self) -> [u64; 24] {
        crate::utils::fill_time_distribution(&self.time_distribution)
    }
}

/// A conversation summarized for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_lead_flags"))]
pub struct Lead {
    /// Conversation id
    pub id: i64,
    /// Messenger user id, if known
    pub user_id: Option<String>,
    /// Conversation start
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last modification
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Most recent user question
    pub last_question: Option<String>,
    /// Most recent bot answer
    pub last_answer: Option<String>,
    /// Time of the most recent message
    #[serde(with = "timestamp")]
    pub last_message_time: DateTime<Utc>,
    /// Questions asked so far
    pub question_count: u64,
    /// Answers given so far
    pub answer_count: u64,
    /// Whether the last question is still waiting for an answer
    pub is_unanswered: bool,
    /// Minutes the last question has been waiting
    #[validate(range(min = 0))]
    pub unanswered_minutes: Option<i64>,
}

impl Lead {
    /// Name shown in lists
    #[must_use]
    pub fn display_name(&self) -> String {
        crate::utils::display_name(self.user_id.as_deref(), self.id)
    }
}

/// One page of leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LeadsResponse {
    /// Leads on this page
    #[validate(nested)]
    pub leads: Vec<Lead>,
    /// Total number of leads matching the query
    pub count: u64,
    /// Page size used by the server
    pub limit: u32,
    /// Offset used by the server
    pub offset: u32,
}

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The bot
    Assistant,
}

/// One transcript message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Message {
    /// Message id
    pub id: i64,
    /// Author
    pub role: Role,
    /// Message text
    pub content: String,
    /// Send time
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Conversation header of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Conversation {
    /// Conversation id
    pub id: i64,
    /// Messenger user id, if known
    pub user_id: Option<String>,
    /// Conversation start
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last modification
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Full transcript for one lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_lead_detail"))]
pub struct LeadDetail {
    /// Conversation header
    #[validate(nested)]
    pub conversation: Conversation,
    /// Messages in chronological order
    #[validate(nested)]
    pub messages: Vec<Message>,
    /// Whether the last question is still waiting for an answer
    pub is_unanswered: bool,
    /// Minutes the last question has been waiting
    #[validate(range(min = 0))]
    pub unanswered_minutes: Option<i64>,
}

/// A lead that has waited longer than the alert threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UnansweredAlert {
    /// Conversation id
    pub id: i64,
    /// Messenger user id, if known
    pub user_id: Option<String>,
    /// The question waiting for an answer
    pub last_question: String,
    /// When the question was asked
    #[serde(with = "timestamp")]
    pub last_message_time: DateTime<Utc>,
    /// Minutes the question has been waiting
    #[validate(range(min = 0))]
    pub unanswered_minutes: i64,
}

impl UnansweredAlert {
    /// Name shown in lists
    #[must_use]
    pub fn display_name(&self) -> String {
        crate::utils::display_name(self.user_id.as_deref(), self.id)
    }
}

/// Alerts for one threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_alerts_threshold"))]
pub struct UnansweredAlertsResponse {
    /// Alerts, longest waiting first as sent by the server
    #[validate(nested)]
    pub alerts: Vec<UnansweredAlert>,
    /// Number of alerts
    pub count: u64,
    /// Threshold the server applied
    pub threshold_minutes: u32,
}

/// A recurring question cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PopularQuestion {
    /// Representative question text
    pub question: String,
    /// Times asked
    #[validate(range(min = 1))]
    pub count: u64,
    /// Most recent time it was asked
    #[serde(with = "timestamp")]
    pub last_asked: DateTime<Utc>,
}

/// Most frequent questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PopularQuestionsResponse {
    /// Questions, most frequent first
    #[validate(nested)]
    pub questions: Vec<PopularQuestion>,
}

/// Inquiries per mobile carrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CarrierStat {
    /// Carrier code as stored by the bot
    pub carrier: String,
    /// Inquiries mentioning the carrier
    pub count: u64,
}

/// Carrier mix for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PopularCarriersResponse {
    /// Carriers, most frequent first
    #[validate(nested)]
    pub carriers: Vec<CarrierStat>,
    /// Period the numbers cover
    pub period: Period,
}

/// Inquiries per device model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModelStat {
    /// Device model name
    pub model: String,
    /// Inquiries mentioning the model
    pub count: u64,
}

/// Device model popularity for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PopularModelsResponse {
    /// Models, most frequent first
    #[validate(nested)]
    pub models: Vec<ModelStat>,
    /// Period the numbers cover
    pub period: Period,
}

/// Time-of-day distribution for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TimeDistributionResponse {
    /// Period the numbers cover
    pub period: Period,
    /// Per-hour breakdown; hours without inquiries may be missing
    #[validate(nested)]
    pub distribution: Vec<TimeDistributionItem>,
}

impl TimeDistributionResponse {
    /// Per-hour counts for all 24 hours
    #[must_use]
    pub fn hourly(&self) -> [u64; 24] {
        crate::utils::fill_time_distribution(&self.distribution)
    }
}

/// `unanswered_minutes` must be present exactly when the lead is unanswered
fn check_unanswered(is_unanswered: bool, minutes: Option<i64>) -> Result<(), ValidationError> {
    if is_unanswered == minutes.is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("unanswered_minutes")
            .with_message("unanswered_minutes must be set if and only if is_unanswered".into()))
    }
}

fn validate_lead_flags(lead: &Lead) -> Result<(), ValidationError> {
    check_unanswered(lead.is_unanswered, lead.unanswered_minutes)
}

fn validate_lead_detail(detail: &LeadDetail) -> Result<(), ValidationError> {
    check_unanswered(detail.is_unanswered, detail.unanswered_minutes)?;

    let chronological = detail
        .messages
        .windows(2)
        .all(|pair| matches!(pair, [a, b] if a.created_at <= b.created_at));
    if chronological {
        Ok(())
    } else {
        Err(ValidationError::new("messages_order")
            .with_message("messages must be ordered by created_at".into()))
    }
}

fn validate_alerts_threshold(response: &UnansweredAlertsResponse) -> Result<(), ValidationError> {
    let threshold = i64::from(response.threshold_minutes);
    match response
        .alerts
        .iter()
        .find(|alert| alert.unanswered_minutes < threshold)
    {
        None => Ok(()),
        Some(alert) => Err(ValidationError::new("threshold_minutes").with_message(
            format!(
                "alert {} waited {} minutes, below the {} minute threshold",
                alert.id, alert.unanswered_minutes, threshold
            )
            .into(),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn lead_json(is_unanswered: bool, minutes: Option<i64>) -> serde_json::Value {
        json!({
            "id": 7,
            "user_id": "kakao_1234",
            "created_at": "2024-05-01T09:00:00",
            "updated_at": "2024-05-01T09:30:00",
            "last_question": "How do I transfer my number?",
            "last_answer": null,
            "last_message_time": "2024-05-01T09:30:00Z",
            "question_count": 3,
            "answer_count": 2,
            "is_unanswered": is_unanswered,
            "unanswered_minutes": minutes
        })
    }

    #[rstest]
    #[case(Period::Today, "today")]
    #[case(Period::Week, "week")]
    #[case(Period::Month, "month")]
    fn test_period_wire_names(#[case] period: Period, #[case] wire: &str) {
        assert_eq!(period.as_str(), wire);
        assert_eq!(wire.parse::<Period>().unwrap(), period);
        assert_eq!(serde_json::to_value(period).unwrap(), json!(wire));
    }

    #[test]
    fn test_period_rejects_unknown() {
        let err = "year".parse::<Period>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid period: year");
    }

    #[test]
    fn test_sort_enums() {
        assert_eq!(SortField::default(), SortField::UpdatedAt);
        assert_eq!(
            "last_message_time".parse::<SortField>().unwrap(),
            SortField::LastMessageTime
        );
        assert!("name".parse::<SortField>().is_err());

        assert_eq!(SortOrder::default().as_str(), "DESC");
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("asc".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_alert_threshold_choices() {
        assert_eq!(AlertThreshold::default().minutes(), 15);
        assert_eq!("60".parse::<AlertThreshold>().unwrap().label(), "1+ hour");
        assert_eq!(AlertThreshold::from_minutes(5).unwrap().label(), "5+ min");
        assert!(AlertThreshold::from_minutes(20).is_none());
        assert!("abc".parse::<AlertThreshold>().is_err());
        assert_eq!(AlertThreshold::all().count(), 4);
    }

    #[test]
    fn test_lead_accepts_naive_and_offset_timestamps() {
        let lead: Lead = serde_json::from_value(lead_json(true, Some(42))).unwrap();

        assert_eq!(lead.created_at.to_rfc3339(), "2024-05-01T09:00:00+00:00");
        assert_eq!(lead.last_message_time.to_rfc3339(), "2024-05-01T09:30:00+00:00");
        assert!(lead.validate().is_ok());
        assert_eq!(lead.display_name(), "kakao_1234");
    }

    #[rstest]
    #[case(true, Some(42), true)]
    #[case(false, None, true)]
    #[case(true, None, false)]
    #[case(false, Some(3), false)]
    fn test_lead_unanswered_invariant(
        #[case] is_unanswered: bool,
        #[case] minutes: Option<i64>,
        #[case] valid: bool,
    ) {
        let lead: Lead = serde_json::from_value(lead_json(is_unanswered, minutes)).unwrap();
        assert_eq!(lead.validate().is_ok(), valid);
    }

    #[test]
    fn test_leads_response_validates_nested_leads() {
        let response: LeadsResponse = serde_json::from_value(json!({
            "leads": [lead_json(true, Some(10)), lead_json(true, None)],
            "count": 2,
            "limit": 20,
            "offset": 0
        }))
        .unwrap();

        assert!(response.validate().is_err());
    }

    #[test]
    fn test_lead_detail_requires_chronological_messages() {
        let mut detail: LeadDetail = serde_json::from_value(json!({
            "conversation": {
                "id": 7,
                "user_id": null,
                "created_at": "2024-05-01T09:00:00",
                "updated_at": "2024-05-01T09:10:00"
            },
            "messages": [
                {"id": 1, "role": "user", "content": "Hi", "created_at": "2024-05-01T09:00:00"},
                {"id": 2, "role": "assistant", "content": "Hello!", "created_at": "2024-05-01T09:00:05"}
            ],
            "is_unanswered": false,
            "unanswered_minutes": null
        }))
        .unwrap();

        assert!(detail.validate().is_ok());
        assert_eq!(detail.messages[1].role, Role::Assistant);

        detail.messages.reverse();
        let err = detail.validate().unwrap_err();
        assert!(err.to_string().contains("ordered by created_at"));
    }

    #[test]
    fn test_message_role_must_be_known() {
        let result = serde_json::from_value::<Message>(json!({
            "id": 1, "role": "system", "content": "x", "created_at": "2024-05-01T09:00:00"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_alerts_below_threshold_are_rejected() {
        let alert = |minutes: i64| {
            json!({
                "id": minutes,
                "user_id": null,
                "last_question": "Is my order shipped?",
                "last_message_time": "2024-05-01T09:00:00",
                "unanswered_minutes": minutes
            })
        };

        let ok: UnansweredAlertsResponse = serde_json::from_value(json!({
            "alerts": [alert(45), alert(15)],
            "count": 2,
            "threshold_minutes": 15
        }))
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.alerts[1].display_name(), "User #15");

        let bad: UnansweredAlertsResponse = serde_json::from_value(json!({
            "alerts": [alert(45), alert(10)],
            "count": 2,
            "threshold_minutes": 15
        }))
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_time_distribution_hour_range() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "period": "week",
            "inquiries": 12,
            "avg_response_time_seconds": 4.2,
            "time_distribution": [{"hour": 9, "count": 7}, {"hour": 24, "count": 5}]
        }))
        .unwrap();

        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_popular_question_count_at_least_one() {
        let question = PopularQuestion {
            question: "Where is the nearest store?".to_string(),
            count: 0,
            last_asked: Utc::now(),
        };
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_negative_response_time_rejected() {
        let summary = TodaySummary {
            today_inquiries: 1,
            week_inquiries: 1,
            avg_response_time_seconds: -1.0,
            unanswered_count: 0,
        };
        assert!(summary.validate().is_err());
    }
}
