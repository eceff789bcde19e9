use tagsql::{Artifact, Reflect, Templator};

#[derive(Reflect)]
pub struct Renamed {
    #[tag(db = "-", sql = "ignored")]
    pub negated: String,
    #[tag(db = "")]
    pub empty_tag: String,
    #[tag(db = "Mixed_Case")]
    pub mixed: String,
    pub r#type: String,
}

pub fn naming(templator: &Templator) {
    let value = Renamed {
        negated: "a".into(),
        empty_tag: "b".into(),
        mixed: "c".into(),
        r#type: "d".into(),
    };
    let sql = templator
        .render(Artifact::CreateTable, &value)
        .expect("Failed to render CreateTable");
    assert!(sql.contains("negated"));
    assert!(!sql.contains("ignored"));
    assert!(sql.contains("empty_tag"));
    assert!(sql.contains("mixed_case"));
    assert!(!sql.contains("Mixed_Case"));
    assert!(sql.contains("type"));
    assert!(!sql.contains("r#"));
}
