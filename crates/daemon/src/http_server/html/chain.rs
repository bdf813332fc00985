use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use time::OffsetDateTime;
use tracing::instrument;

use common::content_chain::{Post, ReactionSummary, Tag};

use crate::ServiceState;

/// Accent colour per tag, open posts first
const TAG_COLOURS: [&str; 7] = [
    "#9e9e9e", "#e57373", "#ffb74d", "#fff176", "#81c784", "#64b5f6", "#ba68c8",
];

#[derive(Debug, Clone)]
pub struct PostDisplay {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub contents: String,
    pub colour: &'static str,
    pub timestring: String,
    pub restricted: bool,
    /// Everything but the first post links back to its predecessor
    pub is_successor: bool,
    pub summary: Vec<ReactionSummary>,
}

impl From<&Post> for PostDisplay {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            author: post.author.clone(),
            contents: post.contents.clone(),
            colour: tag_colour(post.tag),
            timestring: timestring(post.created_at),
            restricted: !post.is_open(),
            is_successor: post.id > 1,
            summary: post.reaction_summary(),
        }
    }
}

#[derive(Template)]
#[template(path = "chain.html")]
pub struct ChainTemplate {
    pub posts: Vec<PostDisplay>,
    pub days_since: i64,
}

fn tag_colour(tag: Tag) -> &'static str {
    TAG_COLOURS
        .get(tag.value() as usize)
        .copied()
        .unwrap_or(TAG_COLOURS[0])
}

fn timestring(at: OffsetDateTime) -> String {
    format!(
        "{:02}:{:02}, {} {} {}",
        at.hour(),
        at.minute(),
        at.day(),
        at.month(),
        at.year()
    )
}

#[instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> askama_axum::Response {
    let snapshot = state.board().chain();

    // newest first
    let posts = snapshot.posts.iter().rev().map(PostDisplay::from).collect();

    let template = ChainTemplate {
        posts,
        days_since: snapshot.days_since,
    };

    template.into_response()
}
