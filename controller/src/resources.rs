use std::collections::BTreeMap;

use skiff::k8s_openapi::api::core::v1::ResourceRequirements;
use skiff::k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use skiff::{Error, Result, RuntimeSize};

/// Compute and memory quota for one runtime size tier. Limits and requests
/// come out identical: tiers have no burst headroom.
#[derive(Clone, Debug, PartialEq)]
pub struct Resources {
    pub cpu: Quantity,
    pub memory: Quantity,
}

impl Resources {
    pub fn for_size(size: &RuntimeSize) -> Result<Self> {
        let (cpu, memory) = match size.as_str() {
            RuntimeSize::BASIC => ("256m", "256Mi"),
            RuntimeSize::BASIC_2X => ("500m", "256Mi"),
            RuntimeSize::STANDARD => ("500m", "512Mi"),
            RuntimeSize::STANDARD_2X => ("1", "1Gi"),
            RuntimeSize::PERFORMANCE => ("2", "2Gi"),
            other => return Err(Error::InvalidRuntimeSize(other.to_string())),
        };
        Ok(Self {
            cpu: Quantity(cpu.to_string()),
            memory: Quantity(memory.to_string()),
        })
    }
}

impl From<Resources> for BTreeMap<String, Quantity> {
    fn from(value: Resources) -> Self {
        [
            ("cpu".to_string(), value.cpu),
            ("memory".to_string(), value.memory),
        ]
        .into_iter()
        .collect()
    }
}

impl From<Resources> for ResourceRequirements {
    fn from(value: Resources) -> Self {
        let quota = BTreeMap::from(value);
        ResourceRequirements {
            requests: Some(quota.clone()),
            limits: Some(quota),
            ..Default::default()
        }
    }
}
