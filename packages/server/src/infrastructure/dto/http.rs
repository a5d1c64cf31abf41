//! HTTP API response DTOs for the hub.

use serde::{Deserialize, Serialize};

use fanout_shared::time::timestamp_to_rfc3339;

use crate::domain::{HubSnapshot, MemberSummary};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

impl HealthDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Hub membership for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubStatsDto {
    pub connections: usize,
    pub members: Vec<MemberDto>,
    pub started_at: String, // ISO 8601
}

/// Single member for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: String,
    pub connected_at: String, // ISO 8601
}

impl From<&MemberSummary> for MemberDto {
    fn from(member: &MemberSummary) -> Self {
        Self {
            id: member.id.as_str().to_string(),
            connected_at: timestamp_to_rfc3339(member.registered_at.value()),
        }
    }
}

impl HubStatsDto {
    pub fn new(snapshot: &HubSnapshot, started_at: i64) -> Self {
        Self {
            connections: snapshot.connection_count,
            members: snapshot.members.iter().map(MemberDto::from).collect(),
            started_at: timestamp_to_rfc3339(started_at),
        }
    }
}
