use std::sync::mpsc::Sender;
use tagsql::{Artifact, Reflect, Templator};

#[derive(Reflect)]
pub struct Empty {}

#[derive(Reflect)]
pub struct Hidden {
    secret: String,
    pub shown: i32,
}

#[derive(Reflect)]
pub struct Tree {
    #[tag(db = "id", primarykey)]
    pub id: i32,
    pub parent: Option<Box<Tree>>,
    pub children: Vec<Tree>,
    pub updates: Option<Sender<i32>>,
}

pub fn degenerate(templator: &Templator) {
    for artifact in Artifact::ALL {
        templator
            .render(artifact, &Empty {})
            .unwrap_or_else(|e| panic!("Failed to render {} of an empty struct: {:#}", artifact, e));
    }

    let hidden = Hidden {
        secret: "s".into(),
        shown: 1,
    };
    let sql = templator
        .render(Artifact::CreateTable, &hidden)
        .expect("Failed to render a struct with private fields");
    assert!(!sql.contains("secret"));
    assert!(!hidden.secret.is_empty());

    let leaf = Tree {
        id: 1,
        parent: None,
        children: Vec::new(),
        updates: None,
    };
    let nested = Tree {
        id: 2,
        parent: Some(Box::new(Tree {
            id: 3,
            parent: None,
            children: Vec::new(),
            updates: None,
        })),
        children: vec![Tree {
            id: 4,
            parent: None,
            children: Vec::new(),
            updates: None,
        }],
        updates: None,
    };
    let leaf = templator
        .render(Artifact::CreateTable, &leaf)
        .expect("Failed to render a recursive struct");
    let nested = templator
        .render(Artifact::CreateTable, &nested)
        .expect("Failed to render a recursive struct");
    assert_eq!(leaf, nested);

    assert!(templator.render(Artifact::CreateTable, &42).is_err());
    assert!(templator.render(Artifact::CreateTable, &()).is_err());
    assert!(templator.render(Artifact::CreateTable, &vec![1, 2]).is_err());
}
