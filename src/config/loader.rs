//! Load activity definitions from TOML files
//!
//! All enum-valued strings (metric ids, unit kinds, limit policies, filter
//! fields) are validated here, at load time. An unknown key is a fatal
//! configuration error naming the offender; nothing is deferred to the
//! computation path.

use crate::activity::filter::FilterGroup;
use crate::activity::limits::{LimitParams, LimitPolicy};
use crate::activity::metrics::{MetricId, MetricTable, MetricUnit};
use crate::activity::requests::{LabourMeasure, LabourRequirement, RequestConfig};
use crate::core::error::{MusterError, Result};
use crate::core::types::ResourceKind;
use crate::herd::member::{AttributeField, CompareOp, MemberStatus, Predicate};
use std::fs;
use std::path::Path;

/// The effect an activity applies to each acted-upon member
///
/// The condition is the secondary predicate of the execution phase: members
/// failing it are passed over without counting against the quota.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectConfig {
    pub condition: Option<Predicate>,
    pub set_status: Option<MemberStatus>,
    pub move_to: Option<String>,
}

/// A fully-validated activity definition
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityConfig {
    pub name: String,
    pub filter_groups: Vec<FilterGroup>,
    pub metrics: MetricTable,
    pub request: Option<RequestConfig>,
    pub labour: Option<LabourRequirement>,
    pub effect: EffectConfig,
}

/// Load one activity definition from a TOML file
pub fn load_activity(path: &Path) -> Result<ActivityConfig> {
    let content = fs::read_to_string(path)?;
    parse_activity_toml(&content)
}

/// Parse and validate an activity definition
pub fn parse_activity_toml(content: &str) -> Result<ActivityConfig> {
    let root: toml::Value = content.parse()?;
    let activity = root
        .get("activity")
        .and_then(|v| v.as_table())
        .ok_or_else(|| MusterError::InvalidConfig("missing [activity] table".into()))?;

    let name = activity
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("unnamed")
        .to_string();

    let filter_groups = match activity.get("filter_group").and_then(|v| v.as_array()) {
        Some(entries) => entries
            .iter()
            .map(parse_group)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    if filter_groups.is_empty() {
        return Err(MusterError::MissingFilterGroup(name));
    }

    let metrics = match activity.get("metric").and_then(|v| v.as_array()) {
        Some(entries) => {
            let mut pairs = Vec::new();
            for entry in entries {
                let id_str = entry
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| MusterError::InvalidConfig("metric without id".into()))?;
                let unit_str = entry
                    .get("unit")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| MusterError::InvalidConfig("metric without unit".into()))?;
                pairs.push((MetricId::parse(id_str)?, MetricUnit::parse(id_str, unit_str)?));
            }
            MetricTable::new(pairs)
        }
        None => MetricTable::default(),
    };

    let request = match activity.get("request").and_then(|v| v.as_table()) {
        Some(table) => Some(parse_request(table)?),
        None => None,
    };

    let labour = match activity.get("labour").and_then(|v| v.as_table()) {
        Some(table) => Some(parse_labour(table, &name)?),
        None => None,
    };

    let effect = match activity.get("effect").and_then(|v| v.as_table()) {
        Some(table) => parse_effect(table)?,
        None => EffectConfig::default(),
    };

    Ok(ActivityConfig {
        name,
        filter_groups,
        metrics,
        request,
        labour,
        effect,
    })
}

fn parse_predicate(table: &toml::value::Table) -> Result<Predicate> {
    if let Some(field) = table.get("field").and_then(|v| v.as_str()) {
        let op_str = table
            .get("op")
            .and_then(|v| v.as_str())
            .ok_or_else(|| MusterError::InvalidConfig(format!("predicate on '{field}' has no op")))?;
        let value = table
            .get("value")
            .and_then(toml_number)
            .ok_or_else(|| {
                MusterError::InvalidConfig(format!("predicate on '{field}' has no value"))
            })?;
        return Ok(Predicate::Attribute {
            field: AttributeField::parse(field)?,
            op: CompareOp::parse(op_str)?,
            value,
        });
    }
    if let Some(status) = table.get("status").and_then(|v| v.as_str()) {
        return Ok(Predicate::Status {
            status: parse_status(status)?,
        });
    }
    Ok(Predicate::All)
}

fn parse_group(value: &toml::Value) -> Result<FilterGroup> {
    let table = value
        .as_table()
        .ok_or_else(|| MusterError::InvalidConfig("filter group is not a table".into()))?;
    let label = table
        .get("label")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let predicate = parse_predicate(table)?;
    let children = match table.get("child").and_then(|v| v.as_array()) {
        Some(entries) => entries
            .iter()
            .map(parse_group)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    Ok(FilterGroup {
        label,
        predicate,
        children,
    })
}

fn parse_request(table: &toml::value::Table) -> Result<RequestConfig> {
    let resource_str = table
        .get("resource")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MusterError::InvalidConfig("request without resource".into()))?;
    let resource = ResourceKind::parse(resource_str)
        .ok_or_else(|| MusterError::UnknownResourceKind(resource_str.to_string()))?;
    let metric = match table.get("metric").and_then(|v| v.as_str()) {
        Some(s) => MetricId::parse(s)?,
        None => MetricId::Performed,
    };
    Ok(RequestConfig {
        resource,
        metric,
        category: table
            .get("category")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        allow_substitution: table
            .get("allow_substitution")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        whole_units: table
            .get("whole_units")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        unit_size: table.get("unit_size").and_then(toml_number).unwrap_or(1.0),
    })
}

fn parse_labour(table: &toml::value::Table, activity: &str) -> Result<LabourRequirement> {
    let measure = match table.get("measure").and_then(|v| v.as_str()) {
        Some("fixed") => LabourMeasure::Fixed,
        Some("per-unit") | None => LabourMeasure::PerUnit,
        Some(other) => {
            return Err(MusterError::InvalidConfig(format!(
                "unknown labour measure: {other}"
            )))
        }
    };
    let policy_str = table
        .get("policy")
        .and_then(|v| v.as_str())
        .unwrap_or("as-days-required");
    let groups = match table.get("group").and_then(|v| v.as_array()) {
        Some(entries) => entries
            .iter()
            .map(parse_group)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    if groups.is_empty() {
        return Err(MusterError::MissingLabourGroup(activity.to_string()));
    }
    let metric = match table.get("metric").and_then(|v| v.as_str()) {
        Some(s) => MetricId::parse(s)?,
        None => MetricId::Performed,
    };
    Ok(LabourRequirement {
        metric,
        rate: table.get("rate").and_then(toml_number).unwrap_or(1.0),
        unit_size: table.get("unit_size").and_then(toml_number).unwrap_or(1.0),
        measure,
        whole_units: table
            .get("whole_units")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        apply_to_all: table
            .get("apply_to_all")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        policy: LimitPolicy::parse(policy_str)?,
        groups,
        params: LimitParams {
            max_per_person: table
                .get("max_per_person")
                .and_then(toml_number)
                .unwrap_or(f64::MAX),
            max_per_group: table
                .get("max_per_group")
                .and_then(toml_number)
                .unwrap_or(f64::MAX),
            min_per_person: table
                .get("min_per_person")
                .and_then(toml_number)
                .unwrap_or(0.0),
        },
        category: table
            .get("category")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        allow_substitution: table
            .get("allow_substitution")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    })
}

fn parse_effect(table: &toml::value::Table) -> Result<EffectConfig> {
    let condition = match table.get("condition").and_then(|v| v.as_table()) {
        Some(cond) => Some(parse_predicate(cond)?),
        None => None,
    };
    let set_status = match table.get("set_status").and_then(|v| v.as_str()) {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };
    Ok(EffectConfig {
        condition,
        set_status,
        move_to: table
            .get("move_to")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    })
}

fn parse_status(s: &str) -> Result<MemberStatus> {
    match s {
        "growing" => Ok(MemberStatus::Growing),
        "weaned" => Ok(MemberStatus::Weaned),
        "culled" => Ok(MemberStatus::Culled),
        other => Err(MusterError::InvalidConfig(format!(
            "unknown member status: {other}"
        ))),
    }
}

fn toml_number(value: &toml::Value) -> Option<f64> {
    value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
}
