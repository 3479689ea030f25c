use std::path::Path;

use cloudlb_core::SimConfig;

pub const CONFIG_FILE: &str = "cloudlb.toml";

pub fn init(path: &str, force: bool) -> anyhow::Result<()> {
    let output = Path::new(path).join(CONFIG_FILE);
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }

    std::fs::write(&output, SimConfig::default().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
