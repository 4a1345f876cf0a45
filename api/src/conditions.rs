use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;

/// Insert or replace the condition sharing `condition`'s type, keeping at
/// most one entry per type. The last transition time is preserved when the
/// status value did not change.
pub fn set_condition(conditions: &mut Vec<Condition>, mut condition: Condition) {
    if let Some(current) = conditions
        .iter_mut()
        .find(|current| current.type_ == condition.type_)
    {
        if current.status == condition.status {
            condition.last_transition_time = current.last_transition_time.clone();
        }
        *current = condition;
    } else {
        conditions.push(condition);
    }
}

pub fn find_condition<'a>(conditions: &'a [Condition], type_: &str) -> Option<&'a Condition> {
    conditions.iter().find(|condition| condition.type_ == type_)
}
