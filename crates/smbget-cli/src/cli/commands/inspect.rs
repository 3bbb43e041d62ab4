//! `smbget inspect <locator>` – show the share split without contacting anything.

use anyhow::Result;
use smbget_core::strategy::{smbclient, MountConvention};
use smbget_core::Locator;

pub fn run_inspect(locator: &str) -> Result<()> {
    let locator = Locator::parse(locator)?;
    let target = locator.share_target()?;
    let (directory, file) = smbclient::split_resource(&target.resource);

    println!("scheme:      {}", locator.scheme);
    println!("share root:  {}", target.root);
    println!("resource:    {}", target.resource);
    println!("directory:   {}", directory);
    println!("file:        {}", file);
    match &locator.credentials {
        Some(creds) => println!(
            "user:        {}{}",
            creds.username,
            if creds.password.is_some() { " (password set)" } else { "" }
        ),
        None => println!("user:        (anonymous)"),
    }
    println!(
        "local mount: {}",
        MountConvention::current()
            .resolve(&target.root, &target.resource)
            .display()
    );
    if let Some(checksum) = &locator.checksum {
        println!("checksum:    {}", checksum);
    }
    Ok(())
}
