// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tourgraph CLI entrypoint.
//!
//! Inspects and maintains the tours kept by a folder store (`<dir>/tours.json`).
//! Logging goes to stderr and is filtered by `RUST_LOG` (default `info`).

use std::error::Error;

use tourgraph::assembler::{
    AckResponse, CreateTourResponse, FetchedTour, FolderBackend, SaveTourRequest, TourAssembler,
    TourMeta, UpdateOverlaysRequest, WriteDurability,
};
use tourgraph::editor::{
    EditorConfig, EditorSession, MarkerTool, NullViewer, PolygonTool, TextTool,
};
use tourgraph::model::{OverlayKind, SphericalCoord, StyleMap, TourId};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  \
{program} [--store <dir>] [--durable-writes] list\n  \
{program} [--store <dir>] show <tour-id>\n  \
{program} [--store <dir>] check <tour-id>\n  \
{program} [--store <dir>] [--durable-writes] delete <tour-id>\n  \
{program} [--store <dir>] [--durable-writes] demo\n  \
{program} schema\n\n\
The store directory defaults to the current working directory.\n\
`check` exits with status 1 when the tour has dangling references or unreadable overlays.\n\
--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Show(TourId),
    Check(TourId),
    Delete(TourId),
    Schema,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    store_dir: Option<String>,
    durable_writes: bool,
    command: Command,
}

fn parse_tour_id(raw: Option<String>) -> Result<TourId, ()> {
    raw.ok_or(())?.parse().map_err(|_| ())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut store_dir = None;
    let mut durable_writes = false;
    let mut command = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                if store_dir.is_some() {
                    return Err(());
                }
                store_dir = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if durable_writes {
                    return Err(());
                }
                durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ if command.is_some() => return Err(()),
            "list" => command = Some(Command::List),
            "show" => command = Some(Command::Show(parse_tour_id(args.next())?)),
            "check" => command = Some(Command::Check(parse_tour_id(args.next())?)),
            "delete" => command = Some(Command::Delete(parse_tour_id(args.next())?)),
            "schema" => command = Some(Command::Schema),
            "demo" => command = Some(Command::Demo),
            _ => return Err(()),
        }
    }

    let command = command.ok_or(())?;
    if command == Command::Schema && (store_dir.is_some() || durable_writes) {
        return Err(());
    }

    Ok(CliOptions {
        store_dir,
        durable_writes,
        command,
    })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_schemas() -> Result<(), Box<dyn Error>> {
    let mut schemas = serde_json::Map::new();
    schemas.insert(
        "SaveTourRequest".to_owned(),
        serde_json::to_value(schemars::schema_for!(SaveTourRequest))?,
    );
    schemas.insert(
        "CreateTourResponse".to_owned(),
        serde_json::to_value(schemars::schema_for!(CreateTourResponse))?,
    );
    schemas.insert(
        "FetchedTour".to_owned(),
        serde_json::to_value(schemars::schema_for!(FetchedTour))?,
    );
    schemas.insert(
        "UpdateOverlaysRequest".to_owned(),
        serde_json::to_value(schemars::schema_for!(UpdateOverlaysRequest))?,
    );
    schemas.insert(
        "AckResponse".to_owned(),
        serde_json::to_value(schemars::schema_for!(AckResponse))?,
    );
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}

/// Builds a two-scene tour through the editor tools and saves it.
async fn run_demo(assembler: &TourAssembler<FolderBackend>) -> Result<(), Box<dyn Error>> {
    let mut session = EditorSession::new(EditorConfig::default(), NullViewer);
    let lobby = session.seed("Lobby", "scenes/lobby.jpg");
    let kitchen = session.seed("Kitchen", "scenes/kitchen.jpg");
    let (lobby_id, kitchen_id) = (lobby.id.clone(), kitchen.id.clone());
    session.create_nodes([lobby, kitchen]);

    let mut markers = MarkerTool::new();
    markers.form_mut().is_link = true;
    markers.form_mut().link_target = Some(kitchen_id.clone());
    markers.form_mut().style = StyleMap::new().with("icon", "arrow");
    markers.toggle_mode(&mut session);
    markers.place(&mut session, SphericalCoord::new(0.8, -0.1))?;
    session.add_link(&lobby_id, &kitchen_id, SphericalCoord::new(0.8, 0.0))?;

    session.switch_node(&kitchen_id)?;
    let mut polygons = PolygonTool::new();
    polygons.form_mut().style = StyleMap::new()
        .with("color", "#ffaa00")
        .with("opacity", 0.4);
    polygons.toggle_drawing_mode(&mut session);
    for (yaw, pitch) in [(-0.3, 0.1), (0.2, 0.1), (0.2, -0.2), (-0.3, -0.2)] {
        polygons.add_point(&mut session, SphericalCoord::new(yaw, pitch))?;
    }
    polygons.finish(&mut session)?;

    let mut texts = TextTool::new();
    texts.form_mut().content = "Back to the lobby".to_owned();
    texts.form_mut().is_link = true;
    texts.form_mut().link_target = Some(lobby_id);
    texts.toggle_mode(&mut session);
    texts.place(&mut session, SphericalCoord::new(3.0, 0.0))?;

    let outcome = assembler
        .save_session(&TourMeta::new("Demo tour"), &mut session)
        .await?;
    println!("created tour {}", outcome.tour_id());
    for (temp_id, server_id) in outcome.id_map().iter() {
        println!("  {temp_id} -> {server_id}");
    }
    Ok(())
}

async fn run_show(
    assembler: &TourAssembler<FolderBackend>,
    tour_id: TourId,
) -> Result<(), Box<dyn Error>> {
    let loaded = assembler.load(tour_id).await?;
    println!("tour {tour_id}: {}", loaded.meta.title);
    for node in loaded.store.nodes() {
        let start = if node.is_start_node() { " (start)" } else { "" };
        println!("  node {}{start}: {} [{}]", node.id(), node.name(), node.scene_ref());
        for kind in OverlayKind::ALL {
            for overlay in node.overlays(kind) {
                match overlay.link_target() {
                    Some(target) => println!("    {kind} {} -> {target}", overlay.id()),
                    None => println!("    {kind} {}", overlay.id()),
                }
            }
        }
        for link in node.links() {
            println!("    link -> {}", link.target());
        }
    }
    Ok(())
}

/// Returns whether the tour is free of problems.
async fn run_check(
    assembler: &TourAssembler<FolderBackend>,
    tour_id: TourId,
) -> Result<bool, Box<dyn Error>> {
    let loaded = assembler.load(tour_id).await?;
    let dangling = loaded.store.dangling_references();
    for reference in &dangling {
        println!(
            "dangling: {} -> {} ({:?})",
            reference.from, reference.target, reference.source
        );
    }
    for record in &loaded.skipped {
        println!(
            "unreadable: node {} {:?}: {}",
            record.node_id, record.item, record.reason
        );
    }
    let ok = dangling.is_empty() && loaded.skipped.is_empty();
    if ok {
        println!("tour {tour_id}: ok ({} nodes)", loaded.store.len());
    }
    Ok(ok)
}

fn main() {
    let result = (|| -> Result<bool, Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tourgraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        if options.command == Command::Schema {
            print_schemas()?;
            return Ok(true);
        }

        let dir = options.store_dir.unwrap_or_else(|| ".".to_owned());
        let backend = if options.durable_writes {
            FolderBackend::new(dir).with_durability(WriteDurability::Durable)
        } else {
            FolderBackend::new(dir)
        };
        let assembler = TourAssembler::new(backend);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async {
            match options.command {
                Command::List => {
                    for tour in assembler.list().await? {
                        println!(
                            "{}\t{}\t{} nodes\t{} overlays",
                            tour.tour_id, tour.title, tour.nodes, tour.overlays
                        );
                    }
                    Ok::<bool, Box<dyn Error>>(true)
                }
                Command::Show(tour_id) => run_show(&assembler, tour_id).await.map(|()| true),
                Command::Check(tour_id) => run_check(&assembler, tour_id).await,
                Command::Delete(tour_id) => {
                    assembler.delete(tour_id).await?;
                    Ok(true)
                }
                Command::Demo => run_demo(&assembler).await.map(|()| true),
                Command::Schema => Ok(true),
            }
        })
    })();

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("tourgraph: {err}");
            std::process::exit(1);
        }
    }
}
