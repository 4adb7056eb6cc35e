//! Walk through the explorer without a user interface.
//!
//! Lists the catalog by category, renders a formula before and after a
//! parameter edit, and runs one assistant turn against a scripted service
//! that adds a new formula through the tool contract.

use formula_explorer::assistant::{
    spawn, Assistant, CancelHandle, Role, ScriptedService, Step, ToolCall, ADD_FORMULA,
    QUICK_ACTIONS,
};
use formula_explorer::config::AssistantConfig;
use formula_explorer::logging::init_logging;
use formula_explorer::{Catalog, ExplorerConfig, RenderData, Workbench};

use log::LevelFilter;
use serde_json::json;

fn print_render(render: &RenderData) {
    println!("{} [{}]", render.name, render.display_latex);
    println!(
        "  y-domain: [{:.3}, {:.3}]",
        render.y_domain.min, render.y_domain.max
    );
    // Every 60th point is enough to see the shape
    for sample in render.samples.iter().step_by(60) {
        match sample.y {
            Some(y) => println!("  x = {:>7.3}  y = {:>10.4}", sample.x, y),
            None => println!("  x = {:>7.3}  y = (undefined)", sample.x),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LevelFilter::Info, None)?;

    println!("Formula explorer");
    println!("================\n");

    // 1. Browse the catalog
    let catalog = Catalog::builtin()?;
    println!("1. Catalog ({} formulas)", catalog.len());
    println!("-------------------------");
    for (category, formulas) in catalog.grouped("") {
        let names: Vec<&str> = formulas.iter().map(|f| f.name.as_str()).collect();
        println!("{}: {}", category, names.join(", "));
    }
    println!();

    let hits: Vec<&str> = catalog.search("gas").iter().map(|f| f.id.as_str()).collect();
    println!("Search 'gas': {:?}\n", hits);

    // 2. Render and edit parameters
    println!("2. Rendering");
    println!("------------");
    let mut bench = Workbench::new(catalog, ExplorerConfig::default())?;
    bench.select("gaussian");
    print_render(&bench.render());

    bench.set_param("c", 0.5);
    println!("\nAfter narrowing the bell curve (c = 0.5):");
    print_render(&bench.render());

    bench.select("ln");
    println!("\nLogarithm, undefined left of zero:");
    print_render(&bench.render());

    let stats = bench.cache_stats();
    println!(
        "\nCache: {} compilations, {} evaluations, {} hits\n",
        stats.compilations, stats.evaluations, stats.hits
    );

    // 3. One assistant turn
    println!("3. Assistant");
    println!("------------");
    for action in QUICK_ACTIONS.iter() {
        println!("Quick action: {}", action.label);
    }

    let cardioid = ToolCall {
        name: ADD_FORMULA.to_string(),
        args: json!({
            "id": "cardioid",
            "name": "Cardioid (upper half)",
            "category": "Curves",
            "expression": "a * (1 - cos(x))",
            "displayLatex": "r = a(1 - \\cos\\theta)",
            "description": "Polar cardioid radius plotted against the angle",
            "params": [
                { "name": "a", "value": 1, "min": 0.1, "max": 5, "step": 0.1, "description": "size" }
            ]
        }),
    };
    let service = ScriptedService::new()
        .reply(vec![
            Step::token("Sure, I'll add a cardioid."),
            Step::ToolCall(cardioid),
            Step::Finish,
        ])
        .reply(vec![
            Step::token("It's on screen now. Try changing a."),
            Step::Finish,
        ]);

    let (client, _service_thread) = spawn(service);
    let mut assistant = Assistant::connect(client, AssistantConfig::default())?;
    let outcome = assistant.run_turn(&mut bench, "draw a cardioid", &CancelHandle::new());
    println!("Turn ended as {:?}, admitted {:?}\n", outcome.state, outcome.admitted);

    for message in assistant.transcript().messages() {
        let who = match message.role {
            Role::User => "you",
            Role::Model => "assistant",
        };
        println!("[{}] {}: {}", message.timestamp.format("%H:%M:%S"), who, message.content);
    }
    println!();

    print_render(&bench.render());

    Ok(())
}
