// SPDX-License-Identifier: MPL-2.0

mod common;

use common::{BODY, client, sign_up_form, signed_in};
use inkpost::api::{ListStyle, PostFilter, PostPayload};
use inkpost::illustration::all_images;
use inkpost::{Admission, AuthError, Edit, Opened, Session, choose_image};

#[tokio::test]
async fn sign_up_then_sign_in_yields_writer_session() {
    let t = client(ListStyle::Data);
    let creds = t.client.credentials();

    let writer = creds
        .sign_up(&sign_up_form("Grace", "grace@example.com", "Cobol1959"))
        .await
        .unwrap();
    let session = creds.sign_in("grace@example.com", "Cobol1959").await.unwrap();

    assert!(session.is_authenticated);
    assert_eq!(session.writer_id.as_deref(), Some(writer.id.as_str()));
    assert_eq!(Session::load(t.store.as_ref()), session);
}

#[tokio::test]
async fn sign_in_failures() {
    let t = client(ListStyle::Keyed);
    signed_in(&t.client, "ada@example.com").await;
    t.client.credentials().logout();

    let creds = t.client.credentials();
    let err = creds.sign_in("nobody@example.com", "Secret123").await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound));

    // Logout dropped the local hash, so sign in once to re-adopt it
    creds.sign_in("ada@example.com", "Secret123").await.unwrap();
    let err = creds.sign_in("ada@example.com", "wrong-one").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidPassword));
}

#[tokio::test]
async fn created_post_shows_up_in_cached_listing() {
    for style in [ListStyle::Bare, ListStyle::Keyed, ListStyle::Data] {
        let t = client(style);
        let writer_id = signed_in(&t.client, "ada@example.com").await;
        let cache = t.client.cache();
        let all = PostFilter::default();

        assert!(cache.list_posts(&all).await.unwrap().blogs.is_empty());
        // Served from cache
        cache.list_posts(&all).await.unwrap();
        assert_eq!(cache.backend().get_count("/blog"), 1);

        cache
            .create_post(&PostPayload {
                title: "Fresh".into(),
                content: BODY.into(),
                excerpt: None,
                tags: vec![],
                is_published: true,
                writer: writer_id.clone(),
            })
            .await
            .unwrap();

        let listed = cache.list_posts(&all).await.unwrap();
        assert_eq!(listed.blogs.len(), 1);
        assert_eq!(listed.blogs[0].title, "Fresh");
        let mine = cache.list_posts(&PostFilter::by_writer(writer_id)).await.unwrap();
        assert_eq!(mine.blogs.len(), 1);
    }
}

#[tokio::test]
async fn editor_round_trip() {
    let t = client(ListStyle::Keyed);

    // Signed out
    match t.client.open_editor(Some("writer-1"), None).await.unwrap() {
        Opened::RedirectTo(path) => assert_eq!(path, "/auth/sign-in"),
        _ => panic!("expected sign-in redirect"),
    }

    let writer_id = signed_in(&t.client, "ada@example.com").await;
    assert_eq!(
        t.client.admission(Some("someone-else")),
        Admission::RedirectTo(format!("/blog/{writer_id}/write"))
    );

    let Opened::Editor(mut editor) = t.client.open_editor(Some(&writer_id), None).await.unwrap()
    else {
        panic!("expected editor");
    };
    editor.edit(Edit::Title("Draft title".into()));
    editor.edit(Edit::Content(BODY.into()));
    editor.edit(Edit::Tags("travel, food".into()));
    assert!(t.client.drafts().load(&writer_id).is_some());

    let published = editor.publish().await.unwrap();
    let post = published.post.unwrap();
    assert_eq!(post.tags, vec!["travel", "food"]);
    assert!(t.client.drafts().load(&writer_id).is_none());

    let image = choose_image(&post);
    assert_eq!(image, choose_image(&post));
    assert!(all_images().any(|i| i == image));
}

#[tokio::test]
async fn draft_survives_reopening_editor() {
    let t = client(ListStyle::Bare);
    let writer_id = signed_in(&t.client, "ada@example.com").await;

    if let Opened::Editor(mut editor) = t.client.open_editor(Some(&writer_id), None).await.unwrap()
    {
        editor.edit(Edit::Content("Half a thought".into()));
    }

    let Opened::Editor(editor) = t.client.open_editor(None, None).await.unwrap() else {
        panic!("expected editor");
    };
    assert_eq!(editor.form().content, "Half a thought");
}
