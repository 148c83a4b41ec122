//! Sample API payloads

use serde_json::{Value, json};

pub fn summary() -> Value {
    json!({
        "today_inquiries": 18,
        "week_inquiries": 240,
        "avg_response_time_seconds": 42.4,
        "unanswered_count": 3
    })
}

pub fn stats(period: &str, inquiries: u64) -> Value {
    json!({
        "period": period,
        "inquiries": inquiries,
        "avg_response_time_seconds": 95.0,
        "time_distribution": [
            { "hour": 9, "count": 4 },
            { "hour": 13, "count": 8 }
        ]
    })
}

pub fn lead(id: i64, unanswered_minutes: Option<i64>) -> Value {
    json!({
        "id": id,
        "user_id": format!("kakao_{id}"),
        "created_at": "2024-05-01T09:00:00",
        "updated_at": "2024-05-01T11:30:00",
        "last_question": format!("Question from lead {id}"),
        "last_answer": null,
        "last_message_time": "2024-05-01T11:35:00",
        "question_count": 2,
        "answer_count": 1,
        "is_unanswered": unanswered_minutes.is_some(),
        "unanswered_minutes": unanswered_minutes
    })
}

/// Leads `first_id..first_id + n` out of `count`
pub fn leads_page(first_id: i64, n: i64, count: u64, offset: u32) -> Value {
    let leads: Vec<Value> = (first_id..first_id + n).map(|id| lead(id, None)).collect();
    json!({ "leads": leads, "count": count, "limit": 20, "offset": offset })
}

pub fn lead_detail(id: i64) -> Value {
    json!({
        "conversation": {
            "id": id,
            "user_id": format!("kakao_{id}"),
            "created_at": "2024-05-01T09:00:00",
            "updated_at": "2024-05-01T11:31:00"
        },
        "messages": [
            { "id": 1, "role": "user", "content": "Can I keep my number?", "created_at": "2024-05-01T11:30:00" },
            { "id": 2, "role": "assistant", "content": "Yes, number porting is free.", "created_at": "2024-05-01T11:31:00" }
        ],
        "is_unanswered": false,
        "unanswered_minutes": null
    })
}

pub fn alerts(threshold: u32, minutes: &[i64]) -> Value {
    let alerts: Vec<Value> = minutes
        .iter()
        .enumerate()
        .map(|(index, waiting)| {
            json!({
                "id": 100 + index,
                "user_id": null,
                "last_question": "Is anyone there?",
                "last_message_time": "2024-05-01T11:00:00",
                "unanswered_minutes": waiting
            })
        })
        .collect();
    json!({ "alerts": alerts, "count": minutes.len(), "threshold_minutes": threshold })
}

pub fn questions() -> Value {
    json!({
        "questions": [
            { "question": "How do I activate eSIM?", "count": 14, "last_asked": "2024-05-01T10:00:00" },
            { "question": "What plans are available?", "count": 6, "last_asked": "2024-04-30T10:00:00" }
        ]
    })
}

pub fn distribution(period: &str) -> Value {
    json!({ "period": period, "distribution": [{ "hour": 20, "count": 11 }] })
}

pub fn carriers(period: &str) -> Value {
    json!({
        "carriers": [
            { "carrier": "SK", "count": 30 },
            { "carrier": "KT", "count": 10 }
        ],
        "period": period
    })
}

pub fn models(period: &str) -> Value {
    json!({
        "models": [
            { "model": "Galaxy S24 Ultra 512GB", "count": 12 },
            { "model": "iPhone 15", "count": 9 }
        ],
        "period": period
    })
}
