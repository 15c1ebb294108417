//! A headless walkthrough: build a widget tree, lay it out, wire up
//! commands, and run the application loop to completion.

use pergola::{
    Application, Bridge, Command, Direction, FixedContent, Group, Size, Style,
    backend::headless::{HeadlessMenus, HeadlessRuntime},
    error::Result,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let menus = HeadlessMenus::new();
    let inspector = menus.inspector();

    let app = Application::new("Demo", |handle| {
        let built = handle.with_state(|s| {
            let root = s.tree.root();
            let toolbar = s.tree.add_child(root, Style::new().with_height(32.0))?;
            let body = s.tree.add_child(
                root,
                Style::new().with_direction(Direction::Row).with_flex(1.0),
            )?;
            let sidebar = s.tree.add_child(body, Style::new().with_width(200.0))?;
            let canvas = s.tree.add_child(body, Style::new().with_flex(1.0))?;
            s.tree
                .set_content(toolbar, Some(Box::new(FixedContent::new(0.0, 32.0))))?;
            s.tree.layout(Size::new(800.0, 600.0))?;
            for (name, id) in [("toolbar", toolbar), ("sidebar", sidebar), ("canvas", canvas)] {
                println!("{name}: {:?}", s.tree.rect(id)?);
            }

            s.commands
                .add(Command::new("Open", Group::new("File"), || {
                    println!("open!");
                    Ok(())
                }));
            Ok::<_, pergola::Error>(())
        });
        if let Err(e) = built.and_then(|r| r) {
            tracing::error!(error = %e, "startup failed");
        }
    });

    let bridge = Bridge::launch(app, HeadlessRuntime::new(), Box::new(menus))?;
    bridge.dispatcher().invoke(|| {})?;

    for container in inspector.snapshot() {
        println!("menu {:?}: {} entries", container.text, container.entries.len());
    }

    bridge.request_exit()?;
    bridge.join()
}
