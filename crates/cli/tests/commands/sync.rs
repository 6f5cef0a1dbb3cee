use crate::common::ChefRepo;
use crate::kw;
use anyhow::Result;

#[test]
fn test_sync_dry_run_covers_every_resource() -> Result<()> {
    let repo = ChefRepo::standard()?;

    let result = kw!(repo, "sync", "--dry-run").assert_success()?;

    assert!(result.contains_stdout("Uploaded cookbook nginx"));
    assert!(result.contains_stdout("Uploaded data bag item users/alice"));
    assert!(result.contains_stdout("Uploaded environment environments/production.rb"));
    assert!(result.contains_stdout("Uploaded role roles/web.json"));
    assert!(result.contains_stdout("Uploaded node nodes/db1.json"));
    assert!(!result.contains_stdout("README.md"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_sync_uploads_in_path_order() -> Result<()> {
    let repo = ChefRepo::standard()?;
    let (knife, log) = repo.fake_knife()?;
    let knife = knife.display().to_string();

    kw!(repo, "sync", "--knife-bin", knife.as_str()).assert_success()?;

    assert_eq!(
        ChefRepo::knife_calls(&log)?,
        vec![
            "cookbook|upload|nginx",
            "data|bag|from|file|users|data_bags/users/alice.json",
            "environment|from|file|environments/production.rb",
            "node|from|file|nodes/db1.json",
            "role|from|file|roles/web.json",
        ]
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_sync_respects_ignore_rules() -> Result<()> {
    let repo = ChefRepo::standard()?;
    repo.write(".gitignore", "nodes/\n")?;
    repo.write(".knifewatch.toml", "[watch]\nignore = [\"environments/*.rb\"]\n")?;
    repo.write("roles/.web.json.swp", "")?;
    let (knife, log) = repo.fake_knife()?;
    let knife = knife.display().to_string();

    kw!(repo, "sync", "--knife-bin", knife.as_str()).assert_success()?;

    assert_eq!(
        ChefRepo::knife_calls(&log)?,
        vec![
            "cookbook|upload|nginx",
            "data|bag|from|file|users|data_bags/users/alice.json",
            "role|from|file|roles/web.json",
        ]
    );
    Ok(())
}

#[test]
fn test_sync_empty_repository() -> Result<()> {
    let repo = ChefRepo::empty()?;
    kw!(repo, "sync", "--dry-run").assert_success()?;
    Ok(())
}
