//! Append-only sequence of posts and their reactions.
//!
//! Posts are kept in insertion order with monotonic ids starting at 1 and
//! are never edited or removed. Reactions only ever grow a post's reaction
//! list. Authentication is not checked here; see [`crate::board::Board`].

mod descriptors;
mod post;

pub use descriptors::{generate_descriptors, DESCRIPTOR_COUNT};
pub use post::{
    NewPost, Post, Reaction, ReactionSummary, Tag, ANONYMOUS_GRAVITAS, CREDENTIAL_GRAVITAS,
    TAG_COUNT,
};

use time::OffsetDateTime;

use crate::crypto::CredentialHash;

pub const MAX_TITLE_LEN: usize = 40;
pub const MAX_AUTHOR_LEN: usize = 10;
pub const MAX_CONTENTS_LEN: usize = 1500;
/// Anonymous reactions allowed on a single post
pub const MAX_ANONYMOUS_REACTIONS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentChainError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid tag {0}, expected 0 to 6")]
    InvalidTag(i64),
    #[error("a post with this title already exists")]
    DuplicateTitle,
    #[error("no post with id {0}")]
    UnknownPost(u64),
    #[error("invalid reaction descriptor provided: {0}")]
    InvalidDescriptor(String),
    #[error("no more anonymous reactions can be made")]
    AnonymousLimit,
    #[error("this passcode has already reacted to this post")]
    AlreadyReacted,
}

impl ContentChainError {
    pub fn code(&self) -> &'static str {
        match self {
            ContentChainError::MissingField(_) => "missing_field",
            ContentChainError::TooLong { .. } => "too_long",
            ContentChainError::InvalidTag(_) => "invalid_tag",
            ContentChainError::DuplicateTitle => "duplicate_title",
            ContentChainError::UnknownPost(_) => "unknown_post",
            ContentChainError::InvalidDescriptor(_) => "invalid_descriptor",
            ContentChainError::AnonymousLimit => "anonymous_limit",
            ContentChainError::AlreadyReacted => "already_reacted",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ContentChain {
    posts: Vec<Post>,
}

impl ContentChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a post would be accepted, without appending it
    pub fn check(&self, post: &NewPost) -> Result<Tag, ContentChainError> {
        let tag = Tag::try_from(post.tag)?;

        if post.title.trim().is_empty() {
            return Err(ContentChainError::MissingField("title"));
        }
        if post.contents.trim().is_empty() {
            return Err(ContentChainError::MissingField("contents"));
        }
        check_len("title", &post.title, MAX_TITLE_LEN)?;
        check_len("author", &post.author, MAX_AUTHOR_LEN)?;
        check_len("contents", &post.contents, MAX_CONTENTS_LEN)?;

        if self.posts.iter().any(|p| p.title == post.title) {
            return Err(ContentChainError::DuplicateTitle);
        }

        Ok(tag)
    }

    pub fn append(
        &mut self,
        post: NewPost,
        descriptors: Vec<String>,
        created_at: OffsetDateTime,
    ) -> Result<&Post, ContentChainError> {
        let tag = self.check(&post)?;
        let id = self.posts.last().map(|p| p.id + 1).unwrap_or(1);

        self.posts.push(Post {
            id,
            title: post.title,
            author: post.author,
            contents: post.contents,
            tag,
            descriptors,
            created_at,
            reactions: Vec::new(),
        });
        tracing::debug!(post_id = id, tag = tag.value(), "post appended");

        Ok(&self.posts[self.posts.len() - 1])
    }

    pub fn get(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn latest(&self) -> Option<&Post> {
        self.posts.last()
    }

    /// Attach a reaction to a post.
    ///
    /// Whether `credential` is actually valid is the caller's concern; here
    ///  it only decides the reaction's weight and de-duplication.
    pub fn add_reaction(
        &mut self,
        post_id: u64,
        descriptor: &str,
        credential: Option<CredentialHash>,
        created_at: OffsetDateTime,
    ) -> Result<&Reaction, ContentChainError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(ContentChainError::UnknownPost(post_id))?;

        if !post.has_descriptor(descriptor) {
            return Err(ContentChainError::InvalidDescriptor(descriptor.to_string()));
        }

        let gravitas = match &credential {
            Some(hash) if post.has_reacted(hash) => {
                return Err(ContentChainError::AlreadyReacted);
            }
            Some(_) => CREDENTIAL_GRAVITAS,
            None if post.anonymous_reactions() >= MAX_ANONYMOUS_REACTIONS => {
                return Err(ContentChainError::AnonymousLimit);
            }
            None => ANONYMOUS_GRAVITAS,
        };

        post.reactions.push(Reaction {
            post_id,
            descriptor: descriptor.to_string(),
            gravitas,
            credentialed: credential.is_some(),
            credential,
            created_at,
        });
        tracing::debug!(post_id, descriptor, gravitas, "reaction appended");

        let reactions = &post.reactions;
        Ok(&reactions[reactions.len() - 1])
    }

    /// Whole days since the latest post, or 0 on an empty chain
    pub fn days_since_last_post(&self, now: OffsetDateTime) -> i64 {
        self.latest()
            .map(|p| (now - p.created_at).whole_days().max(0))
            .unwrap_or(0)
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ContentChainError> {
    if value.chars().count() > max {
        return Err(ContentChainError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use time::Duration;

    fn new_post(title: &str, tag: i64) -> NewPost {
        NewPost {
            title: title.to_string(),
            author: "tester".to_string(),
            contents: "testing is so cool".to_string(),
            tag,
        }
    }

    fn deck() -> Vec<String> {
        vec!["brave".to_string(), "calm".to_string(), "witty".to_string()]
    }

    fn chain_with(tags: &[i64]) -> ContentChain {
        let mut chain = ContentChain::new();
        for (i, tag) in tags.iter().enumerate() {
            chain
                .append(new_post(&format!("post {}", i), *tag), deck(), OffsetDateTime::now_utc())
                .unwrap();
        }
        chain
    }

    #[test]
    fn test_append_assigns_monotonic_ids() {
        let chain = chain_with(&[0, 3, 6]);
        let ids: Vec<u64> = chain.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(chain.latest().unwrap().tag.value(), 6);
        assert_eq!(chain.get(2).unwrap().title, "post 1");
        assert!(chain.get(4).is_none());
    }

    #[test]
    fn test_tag_bounds() {
        let mut chain = ContentChain::new();
        let now = OffsetDateTime::now_utc();
        assert_eq!(
            chain.append(new_post("a", 7), deck(), now).unwrap_err(),
            ContentChainError::InvalidTag(7)
        );
        assert_eq!(
            chain.append(new_post("b", -1), deck(), now).unwrap_err(),
            ContentChainError::InvalidTag(-1)
        );
        assert_eq!(
            chain.append(new_post("c", 300), deck(), now).unwrap_err(),
            ContentChainError::InvalidTag(300)
        );
        assert!(chain.is_empty());

        for tag in 0..7 {
            chain
                .append(new_post(&format!("ok {}", tag), tag), deck(), now)
                .unwrap();
        }
        assert_eq!(chain.len(), 7);
    }

    #[test]
    fn test_post_field_validation() {
        let chain = chain_with(&[0]);

        let mut post = new_post("", 1);
        assert_eq!(
            chain.check(&post).unwrap_err(),
            ContentChainError::MissingField("title")
        );

        post.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(chain.check(&post).unwrap_err().code(), "too_long");

        post.title = "fine".to_string();
        post.author = "a very long author".to_string();
        assert_eq!(
            chain.check(&post).unwrap_err(),
            ContentChainError::TooLong {
                field: "author",
                max: MAX_AUTHOR_LEN
            }
        );

        post.author = "me".to_string();
        post.contents = "   ".to_string();
        assert_eq!(
            chain.check(&post).unwrap_err(),
            ContentChainError::MissingField("contents")
        );

        assert_eq!(
            chain.check(&new_post("post 0", 1)).unwrap_err(),
            ContentChainError::DuplicateTitle
        );
    }

    #[test]
    fn test_reaction_to_unknown_post() {
        let mut chain = chain_with(&[0]);
        let err = chain
            .add_reaction(9, "brave", None, OffsetDateTime::now_utc())
            .unwrap_err();
        assert_eq!(err, ContentChainError::UnknownPost(9));
    }

    #[test]
    fn test_reaction_descriptor_must_be_in_deck() {
        let mut chain = chain_with(&[0]);
        let err = chain
            .add_reaction(1, "grumpy", None, OffsetDateTime::now_utc())
            .unwrap_err();
        assert_eq!(err, ContentChainError::InvalidDescriptor("grumpy".to_string()));
    }

    #[test]
    fn test_anonymous_reaction_limit() {
        let mut chain = chain_with(&[0]);
        let now = OffsetDateTime::now_utc();
        for _ in 0..MAX_ANONYMOUS_REACTIONS {
            let reaction = chain.add_reaction(1, "calm", None, now).unwrap();
            assert_eq!(reaction.gravitas, ANONYMOUS_GRAVITAS);
        }
        assert_eq!(
            chain.add_reaction(1, "calm", None, now).unwrap_err(),
            ContentChainError::AnonymousLimit
        );

        // credentialed reactions are not capped by the anonymous limit
        let hash = CredentialHash::from_passcode("abc123");
        let reaction = chain.add_reaction(1, "brave", Some(hash), now).unwrap();
        assert_eq!(reaction.gravitas, CREDENTIAL_GRAVITAS);
        assert!(reaction.credentialed);
    }

    #[test]
    fn test_credential_reacts_once_per_post() {
        let mut chain = chain_with(&[2, 2]);
        let now = OffsetDateTime::now_utc();
        let hash = CredentialHash::from_passcode("abc123");

        chain.add_reaction(1, "witty", Some(hash.clone()), now).unwrap();
        assert_eq!(
            chain
                .add_reaction(1, "calm", Some(hash.clone()), now)
                .unwrap_err(),
            ContentChainError::AlreadyReacted
        );
        assert!(chain.add_reaction(2, "calm", Some(hash), now).is_ok());
    }

    #[test]
    fn test_reaction_summary_orders_by_gravitas() {
        let mut chain = chain_with(&[0]);
        let now = OffsetDateTime::now_utc();
        chain.add_reaction(1, "calm", None, now).unwrap();
        chain.add_reaction(1, "calm", None, now).unwrap();
        chain
            .add_reaction(1, "witty", Some(CredentialHash::from_passcode("x")), now)
            .unwrap();
        chain.add_reaction(1, "brave", None, now).unwrap();

        let summary = chain.get(1).unwrap().reaction_summary();
        let order: Vec<(&str, u32, usize)> = summary
            .iter()
            .map(|s| (s.descriptor.as_str(), s.gravitas, s.count))
            .collect();
        assert_eq!(
            order,
            vec![("witty", 6, 1), ("calm", 4, 2), ("brave", 2, 1)]
        );
    }

    #[test]
    fn test_reaction_credential_is_not_serialized() {
        let mut chain = chain_with(&[1]);
        let hash = CredentialHash::from_passcode("abc123");
        chain
            .add_reaction(1, "calm", Some(hash.clone()), OffsetDateTime::now_utc())
            .unwrap();

        let json = serde_json::to_string(chain.get(1).unwrap()).unwrap();
        assert!(!json.contains(hash.as_str()));
        assert!(json.contains("\"credentialed\":true"));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_days_since_last_post() {
        let mut chain = ContentChain::new();
        let now = OffsetDateTime::now_utc();
        assert_eq!(chain.days_since_last_post(now), 0);

        chain
            .append(new_post("old", 0), deck(), now - Duration::days(8) - Duration::hours(1))
            .unwrap();
        assert_eq!(chain.days_since_last_post(now), 8);
    }
}
