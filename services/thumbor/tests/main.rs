use std::collections::HashMap;
use std::thread;

use log::debug;
use pretty_assertions::assert_eq;
use thurl_core::{Context, StaticEnv};
use thurl_thumbor::{encode_adjustments, Adjustments, Builder, Config, Crop, FilterArgs, Filters};

const ENDPOINT: &str = "http://thumbor.com";
const KEY: &str = "abcdefghijklmnopqrstuvwxyz123";

fn init_builder(key: Option<&str>) -> Builder {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut envs = HashMap::from([("THUMBOR_ENDPOINT".to_string(), ENDPOINT.to_string())]);
    if let Some(key) = key {
        envs.insert("THUMBOR_SECURITY_KEY".to_string(), key.to_string());
    }
    let ctx = Context::new().with_env(StaticEnv { envs });

    let cfg = Config::default().from_env(&ctx);
    debug!("loaded config: {cfg:?}");
    Builder::from_config(&cfg)
}

fn complex_adjustments() -> anyhow::Result<Adjustments> {
    Ok(serde_json::from_str(
        r#"{
            "crop": {"left": 1, "top": 2, "right": 3, "bottom": 4},
            "width": 200, "height": 100,
            "blur": [3, 2],
            "grayscale": "",
            "brightness": "-100"
        }"#,
    )?)
}

#[test]
fn test_build_unsafe_from_env() -> anyhow::Result<()> {
    let builder = init_builder(None);

    assert_eq!(
        builder.build("image.jpg", None),
        "http://thumbor.com/unsafe/image.jpg"
    );
    assert_eq!(
        builder.build("image.jpg", Some(&complex_adjustments()?)),
        "http://thumbor.com/unsafe/1x2:3x4/200x100/filters:blur(3,2):grayscale():brightness(-100)/image.jpg"
    );
    Ok(())
}

#[test]
fn test_build_safe_from_env() -> anyhow::Result<()> {
    let builder = init_builder(Some(KEY));

    assert_eq!(
        builder.build("image.jpg", None),
        "http://thumbor.com/VBzHpmdOfP55Gn1WUoiVqbNACxg=/image.jpg"
    );
    assert_eq!(
        builder.build("image.jpg", Some(&Adjustments::new().size(200, 100))),
        "http://thumbor.com/Sx5oLDLg01zu3dgHkFJQlzBcqcw=/200x100/image.jpg"
    );
    assert_eq!(
        builder.build("image.jpg", Some(&complex_adjustments()?)),
        "http://thumbor.com/aTdK7Q0AL0opoBePUBpm6XAReM8=/1x2:3x4/200x100/filters:blur(3,2):grayscale():brightness(-100)/image.jpg"
    );
    Ok(())
}

#[test]
fn test_json_and_builder_api_agree() -> anyhow::Result<()> {
    let typed = Adjustments::new()
        .crop(Crop::new(1, 2, 3, 4))
        .size(200, 100)
        .filter("blur", [3, 2])
        .filter("grayscale", FilterArgs::default())
        .filter("brightness", -100);

    assert_eq!(
        encode_adjustments(Some(&typed)),
        encode_adjustments(Some(&complex_adjustments()?))
    );
    Ok(())
}

#[test]
fn test_secondary_calls() {
    let builder = init_builder(Some(KEY));

    let filters = Filters::new()
        .with("blur", [3, 2])
        .with("grayscale", "")
        .with("brightness", -100);
    assert_eq!(
        builder.encode_filters(&filters),
        "/filters:blur(3,2):grayscale():brightness(-100)"
    );
    assert_eq!(
        builder.encode_adjustments(Some(&Adjustments::new().width(200))),
        "200x/"
    );
    assert_eq!(builder.sign("image.jpg"), "VBzHpmdOfP55Gn1WUoiVqbNACxg=");
}

#[test]
fn test_segment_shape() {
    let cases = vec![
        Adjustments::new(),
        Adjustments::new().trim(),
        Adjustments::new().fit("//fit-in//"),
        Adjustments::new().halign(" left ").valign("\ttop\n"),
        Adjustments::new().smart().filter("watermark", "http://a.com//b.png,0,0,0"),
        Adjustments::new()
            .trim()
            .crop(Crop::new(0, 0, 10, 10))
            .fit("fit-in")
            .size(0, 10)
            .halign("left")
            .valign("top")
            .smart()
            .filter("fill", "blue"),
    ];

    for adj in cases {
        let segment = encode_adjustments(Some(&adj));
        assert!(!segment.starts_with('/'), "leading slash in {segment:?}");
        assert!(!segment.contains("//"), "double slash in {segment:?}");
        assert!(
            !segment.chars().any(char::is_whitespace),
            "whitespace in {segment:?}"
        );
        assert!(
            segment.is_empty() || segment.ends_with('/'),
            "missing trailing slash in {segment:?}"
        );
    }
}

#[test]
fn test_shared_between_threads() -> anyhow::Result<()> {
    let builder = init_builder(Some(KEY));
    let adj = complex_adjustments()?;
    let expected = builder.build("image.jpg", Some(&adj));

    let urls = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| builder.build("image.jpg", Some(&adj))))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread must not panic"))
            .collect::<Vec<_>>()
    });

    for url in urls {
        assert_eq!(url, expected);
    }
    Ok(())
}
