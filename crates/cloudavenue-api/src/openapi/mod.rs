// vCloud Director OpenAPI client modules
//
// Bindings for the `/cloudapi/1.0.0/` surface. Collections are paginated
// (`page`, `pageSize`, `pageCount`, `values`); mutations answer either
// synchronously or with a `202` task reference in `Location`.

pub mod app_port_profiles;
pub mod certificates;
pub mod dfw;
pub mod edge_gateways;
pub mod firewall;
pub mod firewall_groups;
pub mod models;
pub mod tasks;
pub mod users;
pub mod vdcs;

/// Build a FIQL equality filter, e.g. `name==edge01`.
pub fn fiql_eq(field: &str, value: &str) -> String {
    format!("{field}=={value}")
}

/// Join FIQL clauses with the AND operator.
pub fn fiql_and(clauses: &[String]) -> String {
    clauses.join(";")
}
