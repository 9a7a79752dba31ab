//! `anchorage inspect` command
//!
//! Shows what a build would do for the current settings without running
//! anything.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::json;

use anchorage::builder::autotools::{configure_args, configure_env};
use anchorage::builder::BuildRequirements;
use anchorage::ops::{requirements, Session};
use anchorage::util::process::SystemExecutor;

use crate::cli::InspectArgs;
use crate::commands::open_session;
use crate::GlobalOptions;

/// Variables `configure` sees that anchorage sets itself.
const SHOWN_ENV: &[&str] = &["CFLAGS", "CXXFLAGS", "CPPFLAGS", "LDFLAGS"];

pub fn execute(args: InspectArgs, global: &GlobalOptions) -> Result<()> {
    let session = open_session(global)?;

    let mut ctx = session.context(&SystemExecutor);
    let build_reqs = BuildRequirements::declare(&mut ctx);
    let args_list = configure_args(&ctx);
    let env = configure_env(&ctx);

    let shown_env: BTreeMap<&str, &str> = SHOWN_ENV
        .iter()
        .copied()
        .chain(session.recipe.autotools.env.keys().map(String::as_str))
        .filter_map(|key| env.get(key).map(|value| (key, value)))
        .collect();

    if args.json {
        let options: BTreeMap<&str, String> = session
            .options
            .iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        let requires: Vec<String> = requirements(&session).iter().map(|r| r.to_string()).collect();

        let value = json!({
            "name": session.recipe.name(),
            "version": session.recipe.version(),
            "package_id": session.package_id,
            "settings": session.settings,
            "options": options,
            "native_build": ctx.caps.supports_native_build,
            "requires": requires,
            "build_requires": {
                "host_tools": build_reqs.host_tools,
                "cross_packages": build_reqs.cross_packages,
            },
            "configure_args": args_list,
            "configure_env": shown_env,
            "work_dir": session.work_dir,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_summary(&session, ctx.caps.supports_native_build);

    println!();
    println!("requires:");
    for reference in requirements(&session) {
        println!("  {}", reference);
    }

    if !build_reqs.is_empty() {
        println!("build requires:");
        for package in build_reqs.host_tools.iter().chain(&build_reqs.cross_packages) {
            println!("  {}", package);
        }
    }

    if ctx.caps.supports_native_build {
        println!("configure:");
        for arg in &args_list {
            println!("  {}", arg);
        }
        println!("environment:");
        for (key, value) in &shown_env {
            println!("  {}={}", key, value);
        }
    } else {
        for notice in ctx.notices() {
            println!("note: {}", notice);
        }
    }

    Ok(())
}

fn print_summary(session: &Session, native_build: bool) {
    println!("{} {}", session.recipe.name(), session.recipe.version());
    println!("package id: {}", session.package_id);
    println!("work dir:   {}", session.work_dir.display());
    println!();
    println!("settings:");
    for (key, value) in session.settings.entries() {
        println!("  {} = {}", key, value);
    }
    println!("options:");
    for (name, value) in session.options.iter() {
        println!("  {} = {}", name, value);
    }
    println!(
        "native build: {}",
        if native_build { "yes" } else { "no (headers only)" }
    );
}
