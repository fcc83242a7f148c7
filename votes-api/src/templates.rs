use serde::Serialize;
use tera::{Context, Tera};
use votes_app::domain::Vote;
use votes_app::transfer::format_timestamp;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("vote_list.html", include_str!("../templates/vote_list.html")),
    ("vote.html", include_str!("../templates/vote.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("api.html", include_str!("../templates/api.html")),
];

/// Server-rendered pages, compiled once at startup.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn load() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }
}

/// A vote prepared for display; tallies are already formatted.
#[derive(Debug, Serialize)]
pub struct VoteView {
    pub id: i32,
    pub subject: String,
    pub vote_taken: String,
    pub taken_display: String,
    pub ayes: String,
    pub nays: String,
    pub label: String,
}

impl From<&Vote> for VoteView {
    fn from(vote: &Vote) -> Self {
        let tally = |count: Option<i32>| count.map_or_else(|| "-".to_string(), |c| c.to_string());
        Self {
            id: vote.id,
            subject: vote.subject.clone(),
            vote_taken: format_timestamp(&vote.vote_taken),
            taken_display: vote.vote_taken.format("%c").to_string(),
            ayes: tally(vote.ayes),
            nays: tally(vote.nays),
            label: vote.to_string(),
        }
    }
}
