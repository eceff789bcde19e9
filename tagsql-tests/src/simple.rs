use rust_decimal::Decimal;
use tagsql::{Artifact, Reflect, Templator};
use time::{Date, Month};
use uuid::Uuid;

#[derive(Reflect)]
#[tag(table = "accounts")]
pub struct Account {
    #[tag(db = "account_id", primarykey)]
    pub id: i64,
    #[tag(db = "owner_name")]
    pub owner: String,
    pub balance: Decimal,
    pub opened: Date,
    pub token: Option<Uuid>,
    #[tag(db = "created", last = "max(created)")]
    pub created: i64,
}

#[derive(Reflect)]
#[tag(table = "notes")]
pub struct Note {
    pub title: String,
    pub body: String,
}

pub fn simple(templator: &Templator) {
    let account = Account {
        id: 1,
        owner: "ada".into(),
        balance: Decimal::new(1050, 2),
        opened: Date::from_calendar_date(2024, Month::March, 1).expect("Invalid date"),
        token: Some(Uuid::nil()),
        created: 1700000000,
    };
    for artifact in Artifact::ALL {
        let sql = templator
            .render(artifact, &account)
            .unwrap_or_else(|e| panic!("Failed to render {}: {:#}", artifact, e));
        let again = templator
            .render(artifact, &account)
            .expect("Second render failed");
        assert_eq!(sql, again, "{} is not deterministic", artifact);
    }

    let create = templator
        .render(Artifact::CreateTable, &account)
        .expect("Failed to render CreateTable");
    assert!(create.contains("accounts"));
    assert!(create.to_uppercase().contains("PRIMARY KEY"));
    let positions: Vec<_> = ["account_id", "owner_name", "balance", "opened", "token", "created"]
        .iter()
        .map(|c| create.find(c).unwrap_or_else(|| panic!("Column {} missing", c)))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "Columns out of order");

    let create = templator
        .render(Artifact::CreateTable, &Note {
            title: "t".into(),
            body: "b".into(),
        })
        .expect("Failed to render CreateTable");
    assert!(!create.to_uppercase().contains("PRIMARY KEY"));

    let recent = templator
        .render(Artifact::GetMostRecent, &account)
        .expect("Failed to render GetMostRecent");
    assert!(recent.contains("max(created)"));
}
