// ABOUTME: Fixed table inventory for the dw warehouse schema
// ABOUTME: Encodes the manually maintained dependency order used by every phase

/// Schema every warehouse table lives in, on both source and destination.
pub const SCHEMA: &str = "dw";

/// Warehouse tables in dependency order: dimensions first, then facts.
///
/// This is a hand-maintained topological order over the foreign-key graph,
/// not something derived from the catalog. Creation and insertion walk it
/// forward (referenced tables before referencing tables); the destructive
/// reset walks it reversed (dependents cleared before their references).
/// Any new table or new foreign key requires updating this list by hand.
pub const TABLES: &[&str] = &[
    "dim_date",
    "dim_insurer",
    "dim_claim_type",
    "dim_assessment_type",
    "dim_status",
    "dim_part_type",
    "dim_part_brand",
    "dim_part",
    "dim_vehicle",
    "dim_workshop",
    "dim_supplier",
    "dim_shipping_company",
    "dim_warehouse",
    "dim_user",
    "dim_claim",
    "fact_part_order",
];

/// Schema-qualified name for a warehouse table.
pub fn qualified(table: &str) -> String {
    format!("{}.{}", SCHEMA, table)
}
