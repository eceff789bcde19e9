use std::collections::BTreeMap;
use tagsql::{Artifact, Reflect, Templator};

#[derive(Reflect, Clone)]
#[tag(table = "events")]
pub struct Event {
    #[tag(db = "event_id", primarykey)]
    pub id: String,
    pub kind: String,
    pub payload: Vec<u8>,
}

pub fn collections(templator: &Templator) {
    let event = Event {
        id: "e1".into(),
        kind: "click".into(),
        payload: vec![1, 2, 3],
    };
    let single = templator
        .render(Artifact::CreateTable, &event)
        .expect("Failed to render a single event");
    let batch = vec![event.clone(), event.clone()];
    let empty: Vec<Event> = Vec::new();
    let keyed = BTreeMap::from([("first".to_string(), event.clone())]);
    for (what, sql) in [
        ("batch", templator.render(Artifact::CreateTable, &batch)),
        ("empty batch", templator.render(Artifact::CreateTable, &empty)),
        ("slice", templator.render(Artifact::CreateTable, batch.as_slice())),
        ("map", templator.render(Artifact::CreateTable, &keyed)),
        ("boxed", templator.render(Artifact::CreateTable, &Box::new(event.clone()))),
        ("optional", templator.render(Artifact::CreateTable, &Some(event.clone()))),
    ] {
        let sql = sql.unwrap_or_else(|e| panic!("Failed to render the {}: {:#}", what, e));
        assert_eq!(sql, single, "The {} renders differently", what);
    }
}
