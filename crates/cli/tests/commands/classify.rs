use crate::common::ChefRepo;
use crate::kw;
use anyhow::Result;
use serde_json::Value;

#[test]
fn test_classify_text_output() -> Result<()> {
    let repo = ChefRepo::standard()?;

    let result = kw!(
        repo,
        "classify",
        "cookbooks/nginx/recipes/default.rb",
        "roles/web.json",
        "README.md"
    )
    .assert_success()?;

    assert!(result.contains_stdout("cookbook nginx"));
    assert!(result.contains_stdout("knife cookbook upload nginx"));
    assert!(result.contains_stdout("role roles/web.json"));
    assert!(result.contains_stdout("knife role from file roles/web.json"));
    assert!(result.contains_stdout("unmatched"));
    Ok(())
}

#[test]
fn test_classify_json_output() -> Result<()> {
    let repo = ChefRepo::standard()?;

    let result = kw!(
        repo,
        "classify",
        "--json",
        "cookbooks/nginx/recipes/default.rb",
        "cookbooks/nginx/metadata.rb",
        "data_bags/users/alice.json",
        "roles/.web.json.swp",
        "README.md"
    )
    .assert_success()?;

    let entries: Vec<Value> = serde_json::from_str(&result.stdout)?;
    assert_eq!(entries.len(), 3, "cookbook collapsed, swap file dropped");

    assert_eq!(entries[0]["path"], "cookbooks/nginx");
    assert_eq!(entries[0]["resource"]["type"], "cookbook");
    assert_eq!(entries[0]["resource"]["name"], "nginx");
    assert_eq!(
        entries[0]["command"],
        serde_json::json!(["knife", "cookbook", "upload", "nginx"])
    );

    assert_eq!(entries[1]["resource"]["type"], "data_bag_item");
    assert_eq!(entries[1]["resource"]["bag"], "users");
    assert_eq!(entries[1]["resource"]["item"], "alice");
    assert_eq!(
        entries[1]["command"],
        serde_json::json!([
            "knife", "data", "bag", "from", "file", "users", "data_bags/users/alice.json"
        ])
    );

    assert_eq!(entries[2]["path"], "README.md");
    assert!(entries[2]["resource"].is_null());
    assert!(entries[2]["command"].is_null());
    Ok(())
}

#[test]
fn test_classify_includes_knife_config_flag() -> Result<()> {
    let repo = ChefRepo::standard()?;

    let result = kw!(
        repo,
        "classify",
        "--json",
        "-c",
        "/etc/chef/knife.rb",
        "environments/production.rb"
    )
    .assert_success()?;

    let entries: Vec<Value> = serde_json::from_str(&result.stdout)?;
    assert_eq!(
        entries[0]["command"],
        serde_json::json!([
            "knife", "environment", "from", "file", "environments/production.rb", "-c",
            "/etc/chef/knife.rb"
        ])
    );
    Ok(())
}

#[test]
fn test_classify_requires_paths() -> Result<()> {
    let repo = ChefRepo::standard()?;
    kw!(repo, "classify").assert_failure()?;
    Ok(())
}
