//! Snapshots of generated reports and drafts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::record::InspectionRecord;

/// Independent copy of a record and its events at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReport {
    pub dados: InspectionRecord,
    pub eventos: Vec<Event>,
    pub data_criacao: DateTime<Utc>,
    pub versao: u32,
}

impl SavedReport {
    pub fn capture(record: &InspectionRecord, events: &[Event], now: DateTime<Utc>) -> Self {
        Self {
            dados: record.clone(),
            eventos: events.to_vec(),
            data_criacao: now,
            versao: record.version,
        }
    }
}

/// Name to snapshot; entries are added or overwritten by name, never evicted
pub type SavedReportsMap = BTreeMap<String, SavedReport>;
