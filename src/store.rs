//! Client-side post collection, kept current by the initial fetch and the push channel

use crate::models::Post;

/// Holds the posts the client knows about.
///
/// The collection starts unmaterialized. `replace_all` materializes it with
/// the initial fetch result; after that it only grows through `append`.
#[derive(Clone, Debug, Default)]
pub struct PostStore {
    posts: Option<Vec<Post>>,
}

impl PostStore {
    pub fn new() -> Self {
        PostStore { posts: None }
    }

    /// Replace the whole collection, materializing it if needed
    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.posts = Some(posts);
    }

    /// Append a post received from the push channel.
    ///
    /// Returns false and drops the post if the initial fetch has not
    /// materialized the collection yet.
    pub fn append(&mut self, post: Post) -> bool {
        match &mut self.posts {
            Some(posts) => {
                posts.push(post);
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.posts.is_some()
    }

    /// Current posts in arrival order (empty while unmaterialized)
    pub fn posts(&self) -> &[Post] {
        self.posts.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.posts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_before_load_is_dropped() {
        let mut store = PostStore::new();
        assert!(!store.append(Post::new("early", 1)));
        assert!(!store.is_loaded());
        assert!(store.is_empty());

        store.replace_all(Vec::new());
        assert!(store.is_loaded());
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_after_load_keeps_arrival_order() {
        let mut store = PostStore::new();
        store.replace_all(vec![Post::new("a", 1)]);
        assert!(store.append(Post::new("b", 3)));
        assert!(store.append(Post::new("c", 2)));

        let messages: Vec<&str> = store.posts().iter().map(|p| p.message.as_str()).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = PostStore::new();
        store.replace_all(vec![Post::new("same", 5)]);
        store.append(Post::new("same", 5));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let mut store = PostStore::new();
        store.replace_all(vec![Post::new("old", 1)]);
        store.append(Post::new("older", 2));
        store.replace_all(vec![Post::new("new", 3)]);
        assert_eq!(store.posts(), &[Post::new("new", 3)]);
    }
}
