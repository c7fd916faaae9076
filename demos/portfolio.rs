//! Headless walk through a one-page portfolio.
//!
//! Lays out the page sections, binds their reveals, then scrolls to the
//! bottom and back up at 60 frames per second, printing a few animated
//! values on the way:
//! 1. The navigation bar drops in and the hero heading flips in character
//!    by character on load, over drifting background particles
//! 2. Journey entries slide in from alternating sides while the connector
//!    line follows the scrollbar
//! 3. Project cards cascade in and react to hover
//! 4. Skill bars fill once and stay full
//! 5. Switching theme pulses the switcher button
//!
//! To run: RUST_LOG=debug cargo run --example portfolio

use reveal::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

struct Page {
    nav: ElementId,
    hero: ElementId,
    journey_items: Vec<ElementId>,
    journey_line: ElementId,
    cards: Vec<ElementId>,
    bars: Vec<(ElementId, f32)>,
    switcher: ElementId,
}

fn layout(controller: &mut Controller) -> Page {
    let nav = controller.create_element();
    let nav_links: Vec<ElementId> = (0..5).map(|_| controller.create_element()).collect();
    let particles: Vec<ElementId> = (0..12).map(|_| controller.create_element()).collect();
    let hero = controller.create_element();
    let journey = controller.create_element();
    let journey_line = controller.create_element();
    let journey_items: Vec<ElementId> = (0..4).map(|_| controller.create_element()).collect();
    let projects = controller.create_element();
    let cards: Vec<ElementId> = (0..6).map(|_| controller.create_element()).collect();
    let skills = controller.create_element();
    let bars: Vec<(ElementId, f32)> = [95.0, 90.0, 85.0, 80.0]
        .into_iter()
        .map(|level| (controller.create_element(), level))
        .collect();
    let switcher = controller.create_element();

    controller.relayout(|elements| {
        elements.set_bounds(hero, Rect::new(0.0, 200.0, 1280.0, 120.0));
        elements.set_bounds(journey, Rect::new(0.0, 900.0, 1280.0, 1200.0));
        elements.set_bounds(projects, Rect::new(0.0, 2200.0, 1280.0, 900.0));
        elements.set_bounds(skills, Rect::new(0.0, 3200.0, 1280.0, 600.0));
        elements.set_bounds(switcher, Rect::new(1220.0, 16.0, 48.0, 48.0));
    });

    let config = controller.config().clone();

    let drop_in = AnimationDescriptor::from_to(
        PropertyValues::new().y(-100.0),
        PropertyValues::new().y(0.0),
    )
    .duration(0.6)
    .timing(TimingFunction::Power(2, Ease::Out));
    let links = AnimationDescriptor::from_to(
        PropertyValues::new().opacity(0.0).y(-20.0),
        PropertyValues::new().opacity(1.0).y(0.0),
    )
    .duration(0.4)
    .delay(0.2)
    .stagger(0.1)
    .timing(TimingFunction::Power(2, Ease::Out));
    controller.play_on_mount(vec![Track::single(nav, drop_in), Track::new(nav_links, links)]);

    for (index, particle) in particles.iter().enumerate() {
        let spread = index as f32 / particles.len() as f32;
        controller.drift(*particle, 20.0, 3.0 + 2.0 * spread, 2.0 * spread);
    }

    controller.reveal_text(hero, "Building for the web", RevealOptions::title());

    let items = AnimationDescriptor::new(PropertyValues::new().opacity(1.0).x(0.0))
        .from_indexed(vec![
            PropertyValues::new().opacity(0.0).x(-50.0),
            PropertyValues::new().opacity(0.0).x(50.0),
        ])
        .timing(TimingFunction::Power(2, Ease::Out));
    controller.reveal_group(journey, journey_items.clone(), items, RevealOptions::group(0.3));

    let line = AnimationDescriptor::from_to(
        PropertyValues::new().height(0.0),
        PropertyValues::new().height(1200.0),
    );
    let track = Track::single(journey_line, RevealOptions::scrub().apply(line));
    controller.bind(Role::TimelineNode, journey, vec![track], &RevealOptions::scrub());

    let card = config.descriptor(
        PropertyValues::new().opacity(0.0).y(30.0).scale(0.9),
        PropertyValues::new().opacity(1.0).y(0.0).scale(1.0),
    );
    controller.reveal_group(projects, cards.clone(), card, RevealOptions::group(0.2));

    for (index, (bar, level)) in bars.iter().enumerate() {
        let delay = index as f32 * 0.1 + 0.3;
        controller.fill(skills, *bar, Property::Width, *level, RevealOptions::progress_fill(delay));
    }

    Page {
        nav,
        hero,
        journey_items,
        journey_line,
        cards,
        bars,
        switcher,
    }
}

fn scroll(controller: &mut Controller, from: f32, to: f32, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as usize;
    for frame in 1..=frames {
        let t = frame as f32 / frames as f32;
        controller.scroll_to(from + (to - from) * t);
        controller.tick(FRAME);
    }
}

/// Let triggered animations finish; the ambient particle loop never does
fn settle(controller: &mut Controller) {
    for _ in 0..(3.0 / FRAME) as usize {
        controller.tick(FRAME);
    }
}

fn report(controller: &Controller, page: &Page, label: &str) {
    let hero_chars = controller.elements().children(page.hero).to_vec();
    let shown = hero_chars
        .iter()
        .filter(|c| controller.value(**c, Property::Opacity) > 0.99)
        .count();
    println!("== {label}");
    println!("   nav y: {:.0}", controller.value(page.nav, Property::Y));
    println!("   hero characters shown: {}/{}", shown, hero_chars.len());
    println!(
        "   journey x: {:?}",
        page.journey_items
            .iter()
            .map(|id| controller.value(*id, Property::X).round())
            .collect::<Vec<_>>()
    );
    println!(
        "   journey line: {:.0}px",
        controller.value(page.journey_line, Property::Height)
    );
    println!(
        "   cards opacity: {:?}",
        page.cards
            .iter()
            .map(|id| (controller.value(*id, Property::Opacity) * 100.0).round() / 100.0)
            .collect::<Vec<_>>()
    );
    println!(
        "   skill bars: {:?}",
        page.bars
            .iter()
            .map(|(id, _)| controller.value(*id, Property::Width).round())
            .collect::<Vec<_>>()
    );
}

fn main() {
    env_logger::init();

    let themes = ThemeProvider::with_presets().provide();
    let _theme_log = themes.subscribe(|theme| {
        for (name, value) in theme.css_variables() {
            log::info!("{name}: {value}");
        }
    });

    let mut controller = Controller::new();
    let page = layout(&mut controller);

    settle(&mut controller);
    report(&controller, &page, "loaded");

    scroll(&mut controller, 0.0, 1500.0, 1.5);
    report(&controller, &page, "halfway down");

    scroll(&mut controller, 1500.0, 3400.0, 1.5);
    settle(&mut controller);
    report(&controller, &page, "bottom");

    let hover = HoverEffect::card();
    controller.hover_enter(page.cards[0], &hover);
    settle(&mut controller);
    let transform = controller.elements().transform(page.cards[0]);
    println!("   hovered card transform: {:?}", transform);
    controller.hover_leave(page.cards[0], &hover);
    settle(&mut controller);

    scroll(&mut controller, 3400.0, 0.0, 2.0);
    settle(&mut controller);
    report(&controller, &page, "back at the top");

    if themes.select_by_name("Black") {
        controller.pulse(page.switcher);
        settle(&mut controller);
    }
}
