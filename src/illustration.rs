// SPDX-License-Identifier: MPL-2.0

//! Cover illustrations for posts that don't carry their own image.

use crate::api::BlogPost;

struct Catalog {
    name: &'static str,
    keywords: &'static [&'static str],
    images: &'static [&'static str],
}

// Priority order; the first catalog with a matching keyword is used.
static CATALOGS: [Catalog; 7] = [
    Catalog {
        name: "technology",
        keywords: &[
            "tech", "programming", "code", "coding", "software", "javascript", "react", "rust",
            "web", "developer", "computer",
        ],
        images: &[
            "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800",
            "https://images.unsplash.com/photo-1461749280684-dccba630e2f6?w=800",
            "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=800",
            "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=800",
        ],
    },
    Catalog {
        name: "travel",
        keywords: &["travel", "trip", "journey", "adventure", "vacation", "explore", "tourism"],
        images: &[
            "https://images.unsplash.com/photo-1488646953014-85cb44e25828?w=800",
            "https://images.unsplash.com/photo-1469854523086-cc02fe5d8800?w=800",
            "https://images.unsplash.com/photo-1476514525535-07fb3b4ae5f1?w=800",
        ],
    },
    Catalog {
        name: "food",
        keywords: &["food", "recipe", "cooking", "cook", "restaurant", "meal", "baking"],
        images: &[
            "https://images.unsplash.com/photo-1504674900247-0877df9cc836?w=800",
            "https://images.unsplash.com/photo-1493770348161-369560ae357d?w=800",
            "https://images.unsplash.com/photo-1476224203421-9ac39bcb3327?w=800",
        ],
    },
    Catalog {
        name: "nature",
        keywords: &["nature", "forest", "mountain", "ocean", "outdoor", "garden", "wildlife"],
        images: &[
            "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=800",
            "https://images.unsplash.com/photo-1470071459604-3b5ec3a7fe05?w=800",
            "https://images.unsplash.com/photo-1501854140801-50d01698950b?w=800",
        ],
    },
    Catalog {
        name: "business",
        keywords: &["business", "startup", "marketing", "finance", "career", "work", "money"],
        images: &[
            "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?w=800",
            "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=800",
            "https://images.unsplash.com/photo-1507679799987-c73779587ccf?w=800",
        ],
    },
    Catalog {
        name: "lifestyle",
        keywords: &["lifestyle", "life", "fashion", "home", "personal", "culture", "design"],
        images: &[
            "https://images.unsplash.com/photo-1499750310107-5fef28a66643?w=800",
            "https://images.unsplash.com/photo-1484480974693-6ca0a78fb36b?w=800",
            "https://images.unsplash.com/photo-1512820790803-83ca734da794?w=800",
        ],
    },
    Catalog {
        name: "health",
        keywords: &["health", "fitness", "wellness", "exercise", "yoga", "medical", "mental"],
        images: &[
            "https://images.unsplash.com/photo-1506126613408-eca07ce68773?w=800",
            "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?w=800",
            "https://images.unsplash.com/photo-1490645935967-10de6ba17061?w=800",
        ],
    },
];

/// Rolling `hash * 31 + unit` over UTF-16 code units in 32-bit signed
/// arithmetic, so ids hash the same as they do in the web client.
fn id_hash(id: &str) -> u32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .unsigned_abs()
}

fn matching_catalog(post: &BlogPost) -> Option<&'static Catalog> {
    let title = post.title.to_lowercase();
    let tags: Vec<String> = post.tags.iter().map(|t| t.trim().to_lowercase()).collect();

    CATALOGS.iter().find(|catalog| {
        catalog.keywords.iter().any(|&keyword| {
            title.contains(keyword) || tags.iter().any(|tag| tag.contains(keyword))
        })
    })
}

/// Every image the picker can return, in catalog order.
pub fn all_images() -> impl Iterator<Item = &'static str> {
    CATALOGS.iter().flat_map(|c| c.images.iter().copied())
}

/// Name of the catalog a post's tags and title select, if any.
pub fn category_for(post: &BlogPost) -> Option<&'static str> {
    matching_catalog(post).map(|c| c.name)
}

/// Pick the cover image for `post`.
///
/// An explicit `image` is returned unchanged. Otherwise the post id hashes
/// into the catalog its tags or title select, or into every catalog when
/// nothing matches. Same input, same image.
pub fn choose_image(post: &BlogPost) -> String {
    if let Some(image) = post.image.as_deref().filter(|i| !i.is_empty()) {
        return image.to_string();
    }

    let hash = id_hash(&post.id) as usize;
    match matching_catalog(post) {
        Some(catalog) => catalog.images[hash % catalog.images.len()].to_string(),
        None => {
            let total = CATALOGS.iter().map(|c| c.images.len()).sum::<usize>();
            all_images()
                .nth(hash % total)
                .unwrap_or_default()
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WriterRef;

    fn post(id: &str, title: &str, tags: &[&str]) -> BlogPost {
        BlogPost {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            excerpt: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_published: true,
            writer: WriterRef::Id("w1".into()),
            image: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn hash_matches_web_client() {
        assert_eq!(id_hash(""), 0);
        assert_eq!(id_hash("a"), 97);
        assert_eq!(id_hash("ab"), 97 * 31 + 98);
        // Wraps past i32 several times
        assert_eq!(id_hash("65f1c2a9e4b0d3f7a1c8e902"), 691_469_929);
        // Lands exactly on i32::MIN, whose absolute value is 2^31
        assert_eq!(id_hash("alxez00b"), 2_147_483_648);
    }

    #[test]
    fn deterministic_and_from_catalog() {
        let all: Vec<&str> = all_images().collect();
        for (id, title, tags) in [
            ("p1", "Learning Rust", &["programming"][..]),
            ("p2", "Weekend in Lisbon", &["travel"][..]),
            ("p3", "Untitled", &[][..]),
            ("65f1c2a9e4b0d3f7a1c8e902", "Thoughts", &["misc"][..]),
        ] {
            let p = post(id, title, tags);
            let first = choose_image(&p);
            assert_eq!(first, choose_image(&p));
            assert!(all.contains(&first.as_str()), "{first} not in catalog");
        }
    }

    #[test]
    fn explicit_image_wins() {
        let mut p = post("p1", "Learning Rust", &["programming"]);
        p.image = Some("https://example.com/cover.png".into());
        assert_eq!(choose_image(&p), "https://example.com/cover.png");
    }

    #[test]
    fn keyword_selects_catalog() {
        let p = post("p1", "Street food tour", &[]);
        assert_eq!(category_for(&p), Some("food"));
        let travel: Vec<&str> = CATALOGS[1].images.to_vec();
        let p = post("p1", "Notes", &["Adventure"]);
        assert!(travel.contains(&choose_image(&p).as_str()));
    }

    #[test]
    fn earlier_catalog_has_priority() {
        // Both technology and travel keywords present
        let p = post("p1", "Travel apps", &["software"]);
        assert_eq!(category_for(&p), Some("technology"));
        let p = post("p1", "Untitled", &[]);
        assert_eq!(category_for(&p), None);
    }
}
