// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Prints every basic style, a few extended and truecolor samples, and uses a style as
//! a scoped guard.
//!
//! ```text
//! cargo run --example demo -- --tiers=basic,extended --verbose
//! ```

use r3bl_ansi_palette::{FOREGROUND, Palette, PaletteConfig, Palettes, StyleLookup};

fn main() -> miette::Result<()> {
    let mut config = PaletteConfig::default();
    let mut is_verbose = false;
    for arg in std::env::args().skip(1) {
        if arg == "--verbose" {
            is_verbose = true;
        } else if let Some(tiers) = arg.strip_prefix("--tiers=") {
            config = config.with_tiers_str(tiers)?;
        } else if let Some(path) = arg.strip_prefix("--x11-rgb-file=") {
            config = config.with_x11_rgb_file(Some(path.into()));
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if is_verbose {
            tracing::Level::TRACE
        } else {
            tracing::Level::WARN
        })
        .init();

    let palettes = Palettes::new(&config);
    println!("tiers: {}", palettes.fg.tiers());

    // Basic names, for each family.
    for palette in [&palettes.fg, &palettes.bg, &palettes.fx] {
        print!("{:>12}: ", palette.family().name);
        for name in palette.family().basic_names() {
            let entry = palette.get(name)?;
            print!("{} ", entry.apply(entry.name()));
        }
        println!();
    }

    // Extended and truecolor.
    for name in ["i208", "i_42", "n_f80", "t_b0b", "t_ff8800", "orchid", "x_navyblue"] {
        match palettes.fg.get(name) {
            Ok(entry) if entry.is_active() => println!("{}", entry.apply(name)),
            Ok(_) => println!("{name} (tier not enabled)"),
            Err(err) => println!("{name}: {err}"),
        }
    }

    // Combine across palettes, the default becomes the generic reset.
    let warning = &*palettes.fg.get("yellow")? + &*palettes.bg.get("blue")?;
    println!("{}", warning.apply_with(" warning ", &[&*palettes.fx.get("bold")?]));

    // Scoped: the reset is emitted when the closure returns.
    palettes.fx.get("italic")?.scoped(|| {
        print!("inside an italic scope");
    })?;
    println!();

    // A disabled palette is oblivious to names.
    let disabled = Palette::new(&FOREGROUND, &config.clone().with_tiers_str("none")?);
    println!("{}", disabled.get("no_such_color")?.apply("plain text"));

    Ok(())
}
