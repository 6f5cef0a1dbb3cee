use crate::common::ChefRepo;
use crate::kw;
use anyhow::Result;

#[test]
fn test_config_defaults() -> Result<()> {
    let repo = ChefRepo::empty()?;

    let result = kw!(repo, "config").assert_success()?;

    assert!(result.contains_stdout("(defaults)"));
    assert!(result.contains_stdout("(no options)"));
    assert!(result.contains_stdout("knife"));
    assert!(result.contains_stdout("(none)"));
    Ok(())
}

#[test]
fn test_config_reads_repository_settings() -> Result<()> {
    let repo = ChefRepo::empty()?;
    repo.write(
        ".knifewatch.toml",
        "[knife]\nconfig = \"/etc/chef/knife.rb\"\n\n[watch]\ndebounce_ms = 500\n",
    )?;

    let result = kw!(repo, "config").assert_success()?;

    assert!(result.contains_stdout(".knifewatch.toml"));
    assert!(result.contains_stdout("500"));
    assert!(result.contains_stdout("-c /etc/chef/knife.rb"));
    Ok(())
}

#[test]
fn test_config_falls_back_to_home_knife_rb() -> Result<()> {
    let repo = ChefRepo::empty()?;
    let knife_rb = repo.home().join(".chef/knife.rb");
    std::fs::create_dir_all(repo.home().join(".chef"))?;
    std::fs::write(&knife_rb, "chef_server_url 'https://chef.example'\n")?;

    let result = kw!(repo, "config").assert_success()?;

    assert!(result.contains_stdout(&format!("-c {}", knife_rb.display())));
    Ok(())
}

#[test]
fn test_config_example() -> Result<()> {
    let repo = ChefRepo::empty()?;

    let result = kw!(repo, "config", "--example").assert_success()?;

    assert!(result.contains_stdout("[knife]"));
    assert!(result.contains_stdout("[watch]"));
    assert!(result.contains_stdout("debounce_ms = 200"));
    Ok(())
}

#[test]
fn test_invalid_settings_rejected() -> Result<()> {
    let repo = ChefRepo::empty()?;
    repo.write(".knifewatch.toml", "[watch]\ndebounce_ms = 1\n")?;

    let result = kw!(repo, "config").assert_failure()?;

    assert!(result.contains_stderr("debounce_ms"));
    Ok(())
}
