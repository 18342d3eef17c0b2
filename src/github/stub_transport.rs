use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::github::token_pool::Token;
use crate::github::transport::{ContributionQuery, GraphQlTransport};
use crate::models::{
    ContributionCalendar, ContributionDay, ContributionGraph, ContributionWeek,
    ContributionsCollection, GraphQlError, GraphQlResponse, ResponseData,
};

pub enum StubReply {
    Body(GraphQlResponse),
    TransportError(String),
}

/// Replays scripted replies per year and records which token served each call.
pub struct StubTransport {
    replies: Mutex<HashMap<i32, VecDeque<StubReply>>>,
    calls: Mutex<Vec<(i32, String)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn given(self, year: i32, reply: StubReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(year)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(i32, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn years_requested(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.calls().into_iter().map(|(year, _)| year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

#[async_trait]
impl GraphQlTransport for StubTransport {
    async fn execute(&self, query: &ContributionQuery, token: &Token) -> Result<GraphQlResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((query.year, token.expose().to_string()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&query.year)
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(StubReply::Body(body)) => Ok(body),
            Some(StubReply::TransportError(message)) => Err(Error::GitHubApi(message)),
            None => Err(Error::GitHubApi(format!("no reply scripted for {}", query.year))),
        }
    }
}

pub fn graph(created_at: &str, contribution_years: &[i32], days: &[(&str, u32)]) -> StubReply {
    let created_at: DateTime<Utc> = created_at.parse().unwrap();
    let contribution_days = days
        .iter()
        .map(|(date, count)| ContributionDay {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            contribution_count: *count,
        })
        .collect();

    StubReply::Body(GraphQlResponse {
        data: Some(ResponseData {
            user: Some(ContributionGraph {
                created_at,
                contributions_collection: ContributionsCollection {
                    contribution_years: contribution_years.to_vec(),
                    contribution_calendar: ContributionCalendar {
                        weeks: vec![ContributionWeek { contribution_days }],
                    },
                },
            }),
        }),
        errors: Vec::new(),
        message: None,
    })
}

pub fn error(error_type: Option<&str>, message: &str) -> StubReply {
    StubReply::Body(GraphQlResponse {
        data: Some(ResponseData { user: None }),
        errors: vec![GraphQlError {
            message: message.to_string(),
            error_type: error_type.map(str::to_string),
        }],
        message: None,
    })
}

pub fn not_found() -> StubReply {
    error(Some("NOT_FOUND"), "Could not resolve to a User with the login of 'ghost'.")
}

pub fn rate_limited() -> StubReply {
    StubReply::Body(GraphQlResponse {
        data: None,
        errors: Vec::new(),
        message: Some("API rate limit exceeded for user ID 1.".to_string()),
    })
}
