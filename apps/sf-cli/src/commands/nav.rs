// nav.rs - Run the goal gate against the app's route table.

use sf_goal::{NavigationDecision, NavigationGate, RouteMeta};

use super::Context;

const ROUTES: &[(&str, RouteMeta)] = &[
    ("/", RouteMeta { requires_goal: true }),
    ("/record", RouteMeta { requires_goal: true }),
    ("/progress", RouteMeta { requires_goal: true }),
    ("/goal", RouteMeta { requires_goal: false }),
];

/// Route metadata for `full_path`, ignoring any query string.
fn route_meta(full_path: &str) -> Option<RouteMeta> {
    let path = full_path.split(['?', '#']).next().unwrap_or(full_path);
    ROUTES
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, meta)| *meta)
}

pub async fn execute(ctx: &Context, full_path: &str) -> anyhow::Result<()> {
    let Some(meta) = route_meta(full_path) else {
        anyhow::bail!("unknown route: {}", full_path);
    };

    let gate = NavigationGate::new(ctx.goals.clone(), ctx.session.clone());
    match gate.before_each(full_path, &meta).await {
        NavigationDecision::Proceed => println!("Proceed: {}", full_path),
        NavigationDecision::Redirect { to, redirect } => match redirect {
            Some(back) => println!("Redirect: {} (return to {} after setup)", to, back),
            None => println!("Redirect: {}", to),
        },
    }
    Ok(())
}
