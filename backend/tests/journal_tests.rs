// tests/journal_tests.rs

mod common;

use common::{TestApp, spawn_app, unique_username};
use serde_json::Value;

async fn comment_on(app: &TestApp, jwt: &str, path: &str, content: &str) -> i64 {
    let resp = app
        .client
        .post(app.url(path))
        .bearer_auth(jwt)
        .json(&serde_json::json!({ "content": content }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn reply_counts_follow_the_thread() {
    let app = spawn_app().await;
    let jwt = app.login(&unique_username()).await;
    let post_id = app.create_post(&jwt, "Thread").await;

    let (status, post) = app.get_json(&format!("/api/posts/{post_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(post["comment_count"], 0);

    // A root comment counts towards the post
    let root = comment_on(&app, &jwt, &format!("/api/posts/{post_id}/comments"), "root").await;
    let (_, post) = app.get_json(&format!("/api/posts/{post_id}")).await;
    assert_eq!(post["comment_count"], 1);

    // A reply counts towards its parent only
    let reply = comment_on(&app, &jwt, &format!("/api/comments/{root}/replies"), "reply").await;
    let (_, post) = app.get_json(&format!("/api/posts/{post_id}")).await;
    assert_eq!(post["comment_count"], 1);

    let (_, parent) = app.get_json(&format!("/api/comments/{root}")).await;
    assert_eq!(parent["comment_count"], 1);
    assert!(parent["parent_id"].is_null());

    let (_, child) = app.get_json(&format!("/api/comments/{reply}")).await;
    assert_eq!(child["post_id"], post_id);
    assert_eq!(child["parent_id"], root);
    assert_eq!(child["comment_count"], 0);

    // Post listing shows roots, reply listing shows children
    let (_, roots) = app.get_json(&format!("/api/posts/{post_id}/comments")).await;
    let roots = roots["items"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"], root);

    let (_, replies) = app.get_json(&format!("/api/comments/{root}/replies")).await;
    let replies = replies["items"].as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["id"], reply);
}

#[tokio::test]
async fn user_posts_page_with_a_cursor() {
    let app = spawn_app().await;
    let username = unique_username();
    let jwt = app.login(&username).await;
    let first = app.create_post(&jwt, "one").await;
    let second = app.create_post(&jwt, "two").await;
    let third = app.create_post(&jwt, "three").await;

    let (status, page) = app
        .get_json(&format!("/api/users/{username}/posts?limit=2"))
        .await;
    assert_eq!(status, 200);
    let ids: Vec<i64> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second]);
    assert!(!page["next_cursor"].is_null());

    let cursor = page["next_cursor"].to_string();
    let resp = app
        .client
        .get(app.url(&format!("/api/users/{username}/posts")))
        .query(&[("limit", "2"), ("cursor", cursor.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let page: Value = resp.json().await.unwrap();
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], first);
    assert!(page["next_cursor"].is_null());
}

#[tokio::test]
async fn malformed_cursor_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/api/posts?cursor=nope").await;

    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn count_endpoints_respect_filters() {
    let app = spawn_app().await;
    let alice = unique_username();
    let bob = unique_username();
    let alice_jwt = app.login(&alice).await;
    let bob_jwt = app.login(&bob).await;

    let post_id = app.create_post(&alice_jwt, "alice's").await;
    app.create_post(&bob_jwt, "bob's").await;
    let root = comment_on(&app, &bob_jwt, &format!("/api/posts/{post_id}/comments"), "hi").await;
    comment_on(&app, &alice_jwt, &format!("/api/comments/{root}/replies"), "hey").await;
    comment_on(&app, &alice_jwt, &format!("/api/comments/{root}/replies"), "again").await;

    let (_, all) = app.get_json("/api/posts/count").await;
    assert_eq!(all["count"], 2);
    let (_, mine) = app.get_json(&format!("/api/posts/count?owner={alice}")).await;
    assert_eq!(mine["count"], 1);

    let (_, all) = app.get_json("/api/comments/count").await;
    assert_eq!(all["count"], 3);
    let (_, by_owner) = app
        .get_json(&format!("/api/comments/count?owner={alice}"))
        .await;
    assert_eq!(by_owner["count"], 2);
    let (_, by_post) = app
        .get_json(&format!("/api/comments/count?post_id={post_id}"))
        .await;
    assert_eq!(by_post["count"], 3);
    let (_, by_parent) = app
        .get_json(&format!("/api/comments/count?parent_id={root}"))
        .await;
    assert_eq!(by_parent["count"], 2);

    let (_, comments) = app.get_json(&format!("/api/users/{alice}/comments")).await;
    assert_eq!(comments["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_targets_are_404() {
    let app = spawn_app().await;
    let jwt = app.login(&unique_username()).await;

    assert_eq!(app.get_json("/api/posts/999").await.0, 404);
    assert_eq!(app.get_json("/api/posts/999/comments").await.0, 404);
    assert_eq!(app.get_json("/api/comments/999").await.0, 404);
    assert_eq!(app.get_json("/api/comments/999/replies").await.0, 404);

    for path in ["/api/posts/999/comments", "/api/comments/999/replies"] {
        let resp = app
            .client
            .post(app.url(path))
            .bearer_auth(&jwt)
            .json(&serde_json::json!({ "content": "into the void" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404, "{path}");
    }
}

#[tokio::test]
async fn post_content_is_validated_and_sanitized() {
    let app = spawn_app().await;
    let jwt = app.login(&unique_username()).await;

    let resp = app
        .client
        .post(app.url("/api/posts"))
        .bearer_auth(&jwt)
        .json(&serde_json::json!({ "title": "", "content": "body" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = app
        .client
        .post(app.url("/api/posts"))
        .bearer_auth(&jwt)
        .json(&serde_json::json!({
            "title": "Hello",
            "content": "<p>fine</p><script>alert(1)</script>",
            "favorite": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let (_, post) = app.get_json(&format!("/api/posts/{id}")).await;
    assert_eq!(post["content"], "<p>fine</p>");
    assert_eq!(post["favorite"], true);
}
