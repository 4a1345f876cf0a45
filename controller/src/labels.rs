use std::collections::BTreeMap;

pub const PART_OF: &str = "app.kubernetes.io/part-of";
pub const CREATED_BY: &str = "app.kubernetes.io/created-by";
pub const INSTANCE: &str = "app.kubernetes.io/instance";
pub const VERSION: &str = "app.kubernetes.io/version";

const OPERATOR: &str = "skiff-operator";
const MANAGER: &str = "skiff-controller";

pub type Labels = BTreeMap<String, String>;

/// Merge label layers left to right, later layers winning per key. The
/// provenance pair goes in last, so no caller-supplied layer can override
/// it.
pub fn merge<I>(layers: I) -> Labels
where
    I: IntoIterator<Item = Labels>,
{
    let mut merged = Labels::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged.insert(PART_OF.to_string(), OPERATOR.to_string());
    merged.insert(CREATED_BY.to_string(), MANAGER.to_string());
    merged
}

/// The stable subset used as the workload selector and the service
/// selector. Never derived from mutable spec fields: a selector that
/// drifts with the spec would make updates illegal.
pub fn selector(name: &str) -> Labels {
    merge([[(INSTANCE.to_string(), name.to_string())].into()])
}
