use kube::core::Rule;

pub fn replicas_non_negative() -> Rule {
    Rule::new(include_str!("./replicas_non_negative.cel"))
        .message("replicas must not be negative")
        .field_path(".spec.replicas")
}
