//! Request validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. mode parameter well-formed
//! 2. database metadata retrievable
//! 3. at least one database type present
//! 4. all referenced databases share one type
//! 5. type compatible with mode
//! 6. payload parses to the mode's schema

use std::collections::BTreeSet;

use interactome_core::config::BuildSettings;
use interactome_core::payload::{self, EdgeDescriptor, SeedDescriptor};
use interactome_core::{ConstructionMode, Database, DatabaseType, NetworkRequest};
use interactome_graph::GraphSource;

use crate::error::{BuildError, EmptyKind, Result};

/// What the builder will do for a validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Literal(Vec<EdgeDescriptor>),
    Neighbors(Vec<SeedDescriptor>),
    Gap { gap: usize, seeds: Vec<SeedDescriptor> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub database_type: DatabaseType,
    pub plan: Plan,
}

/// Run every check against `request`.
pub async fn validate<S: GraphSource + ?Sized>(
    source: &S,
    request: &NetworkRequest,
    settings: &BuildSettings,
) -> Result<ValidatedRequest> {
    let gap = check_mode_parameter(request.mode, settings)?;
    let databases = fetch_database_metadata(source, request).await?;
    let types = require_database_types(&databases)?;
    let database_type = require_single_type(types)?;
    check_mode_compatibility(request.mode, &database_type)?;
    let plan = parse_payload(request, gap)?;

    tracing::debug!(%database_type, mode = %request.mode, "Request validated");
    Ok(ValidatedRequest {
        database_type,
        plan,
    })
}

/// Returns the gap as an unsigned hop count for Gap mode.
pub fn check_mode_parameter(mode: ConstructionMode, settings: &BuildSettings) -> Result<Option<usize>> {
    let ConstructionMode::Gap { gap } = mode else {
        return Ok(None);
    };
    if gap < 0 {
        return Err(BuildError::Parameter(format!(
            "gap must be non-negative, got {gap}"
        )));
    }
    if gap > i64::from(settings.max_gap) {
        return Err(BuildError::Parameter(format!(
            "gap {gap} exceeds the configured maximum of {}",
            settings.max_gap
        )));
    }
    usize::try_from(gap)
        .map(Some)
        .map_err(|_| BuildError::Parameter(format!("gap {gap} is out of range")))
}

pub async fn fetch_database_metadata<S: GraphSource + ?Sized>(
    source: &S,
    request: &NetworkRequest,
) -> Result<Vec<Database>> {
    let databases = source.databases(&request.referenced_databases()).await?;
    Ok(databases)
}

pub fn require_database_types(databases: &[Database]) -> Result<BTreeSet<DatabaseType>> {
    let types: BTreeSet<DatabaseType> = databases.iter().map(|d| d.db_type.clone()).collect();
    if types.is_empty() {
        return Err(BuildError::EmptyResult(EmptyKind::NoDatabaseTypes));
    }
    Ok(types)
}

pub fn require_single_type(types: BTreeSet<DatabaseType>) -> Result<DatabaseType> {
    let mut iter = types.into_iter();
    match (iter.next(), iter.next()) {
        (Some(only), None) => Ok(only),
        (Some(first), Some(second)) => {
            let rest: Vec<String> = [first, second]
                .into_iter()
                .chain(iter)
                .map(|t| t.0)
                .collect();
            Err(BuildError::Parameter(format!(
                "databases must share one type, found {}",
                rest.join(", ")
            )))
        }
        (None, _) => Err(BuildError::EmptyResult(EmptyKind::NoDatabaseTypes)),
    }
}

pub fn check_mode_compatibility(mode: ConstructionMode, database_type: &DatabaseType) -> Result<()> {
    if mode.accepts(database_type) {
        return Ok(());
    }
    let expected = if database_type.is_generic() {
        "none"
    } else {
        "neighbors or gap"
    };
    Err(BuildError::Parameter(format!(
        "mode {mode} is not valid for {database_type} databases (expected {expected})"
    )))
}

pub fn parse_payload(request: &NetworkRequest, gap: Option<usize>) -> Result<Plan> {
    let plan = match (request.mode, gap) {
        (ConstructionMode::None, _) => Plan::Literal(payload::parse_edges(&request.payload)?),
        (ConstructionMode::Neighbors, _) => Plan::Neighbors(payload::parse_seeds(&request.payload)?),
        (ConstructionMode::Gap { .. }, Some(gap)) => Plan::Gap {
            gap,
            seeds: payload::parse_seeds(&request.payload)?,
        },
        (ConstructionMode::Gap { gap }, None) => {
            return Err(BuildError::Parameter(format!("gap {gap} was not checked")))
        }
    };
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use interactome_core::{DatabaseId, Visibility};

    fn db(id: &str, db_type: &str) -> Database {
        Database {
            id: DatabaseId::from(id),
            name: id.to_string(),
            db_type: DatabaseType(db_type.to_string()),
            visibility: Visibility::Public,
        }
    }

    #[test]
    fn test_gap_parameter_bounds() {
        let settings = BuildSettings { max_gap: 3 };
        assert_eq!(
            check_mode_parameter(ConstructionMode::Gap { gap: 0 }, &settings).unwrap(),
            Some(0)
        );
        assert_eq!(
            check_mode_parameter(ConstructionMode::Gap { gap: 3 }, &settings).unwrap(),
            Some(3)
        );
        assert!(check_mode_parameter(ConstructionMode::Gap { gap: -1 }, &settings).is_err());
        assert!(check_mode_parameter(ConstructionMode::Gap { gap: 4 }, &settings).is_err());
        assert_eq!(
            check_mode_parameter(ConstructionMode::Neighbors, &settings).unwrap(),
            None
        );
    }

    #[test]
    fn test_single_type_required() {
        let types = require_database_types(&[db("a", "Protein"), db("b", "Protein")]).unwrap();
        assert_eq!(require_single_type(types).unwrap().0, "Protein");

        let types = require_database_types(&[db("a", "Protein"), db("b", "Generic")]).unwrap();
        let err = require_single_type(types).unwrap_err();
        assert_eq!(err.kind(), "ParameterError");
        assert!(err.to_string().contains("Generic, Protein"));

        let err = require_database_types(&[]).unwrap_err();
        assert!(matches!(err, BuildError::EmptyResult(EmptyKind::NoDatabaseTypes)));
    }

    #[test]
    fn test_mode_compatibility() {
        let generic = DatabaseType::generic();
        let protein = DatabaseType("Protein".to_string());

        assert!(check_mode_compatibility(ConstructionMode::None, &generic).is_ok());
        assert!(check_mode_compatibility(ConstructionMode::Gap { gap: 1 }, &protein).is_ok());

        let err = check_mode_compatibility(ConstructionMode::Neighbors, &generic).unwrap_err();
        assert!(err.to_string().contains("expected none"));
        let err = check_mode_compatibility(ConstructionMode::None, &protein).unwrap_err();
        assert!(err.to_string().contains("expected neighbors or gap"));
    }

    #[test]
    fn test_payload_parsed_per_mode() {
        let mut request = NetworkRequest::new(
            [DatabaseId::from("a")],
            [DatabaseId::from("a")],
            ConstructionMode::Gap { gap: 2 },
            serde_json::json!([{"kind": "Seed", "node": {"id": "TP53"}}]),
        );
        assert_eq!(
            parse_payload(&request, Some(2)).unwrap(),
            Plan::Gap {
                gap: 2,
                seeds: vec![SeedDescriptor::node("TP53")]
            }
        );

        // A seed payload is not an edge payload.
        request.mode = ConstructionMode::None;
        let err = parse_payload(&request, None).unwrap_err();
        assert_eq!(err.kind(), "SchemaError");
    }
}
