use tradearea_core::{miles_to_meters, Coordinates, TradeAreaOverlay, Viewport, TRADE_AREA_RADIUS_MILES};

/// Zoom the map opens at after a search.
pub(crate) const DEFAULT_ZOOM: f64 = 13.0;

/// Prints the trade-area circle's pixel radius at each zoom in turn.
///
/// The first zoom builds the viewport; each later one is applied as a zoom
/// change, which recomputes the radius.
pub(crate) fn run_overlay(lat: f64, lng: f64, zooms: &[f64], width: f64, height: f64) {
    let center = Coordinates::new(lng, lat);
    let (first, rest) = zooms.split_first().unwrap_or((&DEFAULT_ZOOM, &[]));

    let mut overlay = TradeAreaOverlay::new(
        Viewport::new(center, *first, width, height),
        center,
        miles_to_meters(TRADE_AREA_RADIUS_MILES),
    );
    print_radius(&overlay);

    for zoom in rest {
        overlay.set_zoom(*zoom);
        print_radius(&overlay);
    }
}

fn print_radius(overlay: &TradeAreaOverlay) {
    println!(
        "zoom {:>5.2}: {TRADE_AREA_RADIUS_MILES} mi trade area = {:.1} px radius",
        overlay.viewport().zoom(),
        overlay.pixel_radius()
    );
}
