//! `resolve` command: look icons up through the sprite loader.
//!
//! Prints one href per icon, or with `--markup` an HTML fragment holding the
//! inlined sprites followed by one `<use>` element per icon.

use anyhow::{Context, Result, bail};

use crate::{
    cli::ResolveArgs,
    config::SpriteConfig,
    loader::{DocumentHost, FileSession, HttpFetcher, IconRef, SpriteLoader},
    log,
    utils::plural::plural_count,
};

pub fn resolve_icons(args: &ResolveArgs, config: &SpriteConfig) -> Result<()> {
    let icons = args
        .icons
        .iter()
        .map(|raw| IconRef::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let output = runtime.block_on(resolve_all(args, config, icons))?;
    println!("{output}");
    Ok(())
}

async fn resolve_all(args: &ResolveArgs, config: &SpriteConfig, icons: Vec<IconRef>) -> Result<String> {
    let loader = SpriteLoader::new(
        config.loader.version.clone(),
        HttpFetcher::new(config.loader.base_url.clone()),
        FileSession::open(&config.loader.session),
    );
    if args.fresh {
        loader.clear();
    }

    // One task per icon, so icons sharing a namespace share one fetch
    let handles: Vec<_> = icons
        .iter()
        .cloned()
        .map(|icon| {
            let loader = loader.clone();
            tokio::spawn(async move { loader.resolve(&icon).await })
        })
        .collect();

    let mut resolved = Vec::with_capacity(handles.len());
    let mut failures = 0;
    for (icon, handle) in icons.iter().zip(handles) {
        match handle.await.context("resolve task panicked")? {
            Ok(found) => resolved.push(found),
            Err(e) => {
                log!("error"; "{}: {}", icon, e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("failed to resolve {}", plural_count(failures, "icon"));
    }

    if !args.markup {
        let hrefs: Vec<String> = icons
            .iter()
            .map(|icon| icon.href(&config.loader.base_url))
            .collect();
        return Ok(hrefs.join("\n"));
    }

    let host = DocumentHost::new();
    for icon in &icons {
        loader.inject(icon.namespace(), &host).await?;
    }
    let mut lines = vec![host.markup()];
    lines.extend(resolved.iter().map(|r| r.use_markup()));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(icons: &[&str]) -> ResolveArgs {
        ResolveArgs {
            icons: icons.iter().map(|s| s.to_string()).collect(),
            base_url: None,
            session: None,
            markup: false,
            fresh: false,
        }
    }

    #[test]
    fn test_invalid_reference_fails_before_fetching() {
        let config = SpriteConfig::default();
        assert!(resolve_icons(&args(&["social:"]), &config).is_err());
    }
}
