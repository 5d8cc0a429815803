//! End-to-end exploration against mocked LLM APIs.

use std::num::NonZeroUsize;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wordwalk_engine::{ExplorationLoop, LlmWordProvider, MAX_POOL_SIZE, TerminationReason};
use wordwalk_types::Provider;

use crate::common::{
    ScriptedSelector, mount_claude_words, mount_openai_words, provider_for,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

#[tokio::test]
async fn openai_walk_reports_last_seeds() {
    let server = MockServer::start().await;
    mount_openai_words(
        &server,
        "cat",
        "feline, kitten, whiskers, purr, meow, tabby, claws, paws, fur, pet",
    )
    .await;
    mount_openai_words(
        &server,
        "dog",
        "puppy, canine, bark, leash, fetch, bone, tail, paws, pet, hound",
    )
    .await;
    mount_openai_words(&server, "kitten", "cub, baby, litter").await;
    mount_openai_words(&server, "puppy", "whelp, litter, young").await;

    let selector = ScriptedSelector::new(&[&["puppy", "kitten"], &[]]);
    let mut walk = ExplorationLoop::new(provider_for(&server, Provider::OpenAI), rng(), selector);

    let outcome = walk.run("Cat, dog").await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::EmptySelection);
    assert_eq!(outcome.rounds_completed, 2);
    let picked = outcome.picked.unwrap();
    let picked: Vec<&str> = picked.iter().map(|w| w.as_str()).collect();
    assert_eq!(picked.len(), 2);
    assert!(picked.contains(&"kitten") && picked.contains(&"puppy"));

    let pools = &walk.selector().pools;
    assert_eq!(pools.len(), 2);
    // Seeds first, then 18 distinct related words ("paws" and "pet" repeat).
    assert_eq!(&pools[0][..2], ["cat", "dog"]);
    assert_eq!(pools[0].len(), 20);
    // "litter" comes back for both seeds of round two.
    assert_eq!(pools[1].len(), 7);
    assert_eq!(pools[1].iter().filter(|w| *w == "litter").count(), 1);
}

#[tokio::test]
async fn claude_walk_stops_at_round_limit() {
    let server = MockServer::start().await;
    mount_claude_words(&server, "ocean", "wave, tide, salt, coral, reef").await;
    mount_claude_words(&server, "wave", "surf, crest, swell").await;

    let selector = ScriptedSelector::new(&[&["wave"], &["surf", "swell"], &["crest"]]);
    let mut walk = ExplorationLoop::new(provider_for(&server, Provider::Claude), rng(), selector)
        .with_max_rounds(NonZeroUsize::new(2));

    let outcome = walk.run("ocean").await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::RoundLimit);
    assert_eq!(outcome.rounds_completed, 2);
    let picked = outcome.picked.unwrap();
    assert_eq!(picked.len(), 2);
    assert!(picked.iter().all(|w| ["surf", "swell"].contains(&w.as_str())));
    assert_eq!(walk.selector().pools.len(), 2);
}

#[tokio::test]
async fn failing_api_still_offers_seeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let selector = ScriptedSelector::new(&[&["sun"], &[]]);
    let mut walk = ExplorationLoop::new(provider_for(&server, Provider::OpenAI), rng(), selector);

    let outcome = walk.run("sun moon").await.unwrap();

    let pools = &walk.selector().pools;
    assert_eq!(pools[0], ["sun", "moon"]);
    assert_eq!(pools[1], ["sun"]);
    assert_eq!(outcome.picked.unwrap().joined(), "sun");
}

#[tokio::test]
async fn missing_api_key_offers_only_seeds() {
    let selector = ScriptedSelector::new(&[&[]]);
    let mut walk = ExplorationLoop::new(
        LlmWordProvider::unconfigured(Provider::Claude),
        rng(),
        selector,
    );

    let outcome = walk.run("river").await.unwrap();

    assert_eq!(walk.selector().pools[0], ["river"]);
    assert_eq!(outcome.picked.unwrap().joined(), "river");
}

#[tokio::test]
async fn invalid_input_never_queries_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut walk = ExplorationLoop::new(
        provider_for(&server, Provider::OpenAI),
        rng(),
        ScriptedSelector::default(),
    );

    let outcome = walk.run("42, hello-world, !!").await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::NoValidSeeds);
    assert!(outcome.picked.is_none());
    assert!(walk.selector().pools.is_empty());
}

#[tokio::test]
async fn noisy_answers_are_filtered_and_capped() {
    let server = MockServer::start().await;
    mount_openai_words(
        &server,
        "tree",
        "Oak, pine tree, birch, 3d, maple, elm-wood, ash, cedar, fir, yew, larch, spruce, willow, alder",
    )
    .await;

    let selector = ScriptedSelector::new(&[&[]]);
    let mut walk = ExplorationLoop::new(provider_for(&server, Provider::OpenAI), rng(), selector);

    walk.run("tree").await.unwrap();

    let pool = &walk.selector().pools[0];
    assert_eq!(pool[0], "tree");
    // Only single alphabetic words survive, at most ten per query.
    assert_eq!(pool.len(), 11);
    assert!(pool.iter().any(|w| w == "Oak"));
    for rejected in ["pine tree", "3d", "elm-wood", "alder"] {
        assert!(!pool.iter().any(|w| w == rejected), "{rejected}");
    }
}

#[tokio::test]
async fn large_rounds_fill_pool_to_capacity() {
    let server = MockServer::start().await;
    let seeds = [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    ];
    for (i, seed) in seeds.iter().enumerate() {
        let letter = char::from(b'a' + i as u8);
        let answer: Vec<String> = ('a'..='j').map(|c| format!("{seed}{letter}{c}")).collect();
        mount_openai_words(&server, seed, &answer.join(", ")).await;
    }

    let selector = ScriptedSelector::new(&[&[]]);
    let mut walk = ExplorationLoop::new(provider_for(&server, Provider::OpenAI), rng(), selector);

    walk.run(&seeds.join(" ")).await.unwrap();

    let pool = &walk.selector().pools[0];
    assert_eq!(pool.len(), MAX_POOL_SIZE);
    assert_eq!(&pool[..10], seeds);
}
