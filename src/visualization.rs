//! Visualization utilities for TSP tours.
//!
//! Generates SVG renderings of the best tour and of the pheromone trail
//! left behind by a run. The solver never consults these: rendering is a
//! fire-and-forget side effect of the surrounding runner.

use crate::colony::PheromoneField;
use crate::instance::TspInstance;
use crate::solution::Solution;
use std::fs::File;
use std::io::Write;
use std::path::Path;
#[cfg(not(feature = "resvg"))]
use std::process::Command;
#[cfg(feature = "resvg")]
use resvg::render;
#[cfg(feature = "resvg")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "resvg")]
use resvg::usvg;
#[cfg(feature = "resvg")]
use resvg::usvg::TreeParsing;
#[cfg(feature = "resvg")]
use resvg::FitTo;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 6.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an SVG rendering of a tour, closing edge included
    pub fn generate_svg(&self, instance: &TspInstance, solution: &Solution) -> String {
        let mut svg = String::new();

        svg.push_str(&self.svg_header());
        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Instance: {} | Cost: {:.2} | Nodes: {}</text>
"##,
            self.margin,
            instance.name,
            solution.cost,
            instance.dimension()
        ));

        let transform = self.plane_transform(instance);

        if solution.tour.len() > 1 {
            for i in 0..solution.tour.len() {
                let from = solution.tour[i];
                let to = solution.tour[(i + 1) % solution.tour.len()];

                let (x1, y1) = transform(instance.nodes[from].x, instance.nodes[from].y);
                let (x2, y2) = transform(instance.nodes[to].x, instance.nodes[to].y);

                svg.push_str(&format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="edge"/>
"#,
                    x1, y1, x2, y2
                ));
            }
        }

        self.push_nodes(&mut svg, instance, &transform);
        svg.push_str("</svg>");

        svg
    }

    /// Generate an SVG of the pheromone trail: edge opacity proportional
    /// to trail strength, faint edges omitted
    pub fn generate_pheromone_svg(
        &self,
        instance: &TspInstance,
        pheromones: &PheromoneField,
    ) -> String {
        let mut svg = String::new();

        svg.push_str(&self.svg_header());
        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Pheromone trail: {}</text>
"##,
            self.margin, instance.name
        ));

        let transform = self.plane_transform(instance);
        let max_trail = pheromones.max_value();
        let n = instance.dimension().min(pheromones.dimension());

        if max_trail > 0.0 {
            for i in 0..n {
                for j in i + 1..n {
                    let strength = pheromones.get(i, j) / max_trail;
                    if strength < 0.05 {
                        continue;
                    }

                    let (x1, y1) = transform(instance.nodes[i].x, instance.nodes[i].y);
                    let (x2, y2) = transform(instance.nodes[j].x, instance.nodes[j].y);

                    svg.push_str(&format!(
                        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="trail" stroke-opacity="{:.3}" stroke-width="{:.2}"/>
"#,
                        x1,
                        y1,
                        x2,
                        y2,
                        strength,
                        1.0 + 3.0 * strength
                    ));
                }
            }
        }

        self.push_nodes(&mut svg, instance, &transform);
        svg.push_str("</svg>");

        svg
    }

    fn svg_header(&self) -> String {
        format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .home {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 2; }}
    .edge {{ stroke: #34495e; stroke-width: 2; fill: none; }}
    .trail {{ stroke: #8e44ad; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        )
    }

    fn push_nodes(
        &self,
        svg: &mut String,
        instance: &TspInstance,
        transform: &impl Fn(f64, f64) -> (f64, f64),
    ) {
        for node in &instance.nodes {
            let (x, y) = transform(node.x, node.y);
            let class = if node.is_home() { "home" } else { "node" };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));
            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x,
                y - self.node_radius - 3.0,
                node.name
            ));
        }
    }

    /// Closure mapping instance coordinates onto the canvas
    fn plane_transform(&self, instance: &TspInstance) -> impl Fn(f64, f64) -> (f64, f64) {
        let (min_x, max_x, min_y, max_y) = self.get_bounds(instance);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        let margin = self.margin;
        let height = self.height;
        move |x: f64, y: f64| -> (f64, f64) {
            let tx = margin + (x - min_x) * scale;
            let ty = height - margin - (y - min_y) * scale;
            (tx, ty)
        }
    }

    /// Get coordinate bounds
    fn get_bounds(&self, instance: &TspInstance) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in &instance.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        (min_x, max_x, min_y, max_y)
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Save SVG as PNG: the native renderer when the `resvg` feature is
    /// enabled, otherwise `rsvg-convert`, `magick` or `inkscape`.
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let path = path.as_ref();

        #[cfg(feature = "resvg")]
        {
            let opt = usvg::Options::default();
            let rtree = usvg::Tree::from_str(svg, &opt).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, format!("usvg parse error: {}", e))
            })?;
            let mut pixmap = Pixmap::new(self.width as u32, self.height as u32).ok_or_else(
                || std::io::Error::new(std::io::ErrorKind::Other, "Failed to create pixmap"),
            )?;
            render(&rtree, FitTo::Original, Transform::default(), pixmap.as_mut()).ok_or_else(
                || std::io::Error::new(std::io::ErrorKind::Other, "resvg render failed"),
            )?;
            pixmap.save_png(path).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, format!("save_png failed: {}", e))
            })?;
            return Ok(());
        }

        #[cfg(not(feature = "resvg"))]
        {
            let tmp_svg = path.with_extension("svg.tmp");
            self.save_svg(svg, &tmp_svg)?;

            let converters: [(&str, Vec<String>); 3] = [
                (
                    "rsvg-convert",
                    vec![
                        "-o".to_string(),
                        path.to_string_lossy().to_string(),
                        tmp_svg.to_string_lossy().to_string(),
                    ],
                ),
                (
                    "magick",
                    vec![
                        "convert".to_string(),
                        tmp_svg.to_string_lossy().to_string(),
                        path.to_string_lossy().to_string(),
                    ],
                ),
                (
                    "inkscape",
                    vec![
                        tmp_svg.to_string_lossy().to_string(),
                        "--export-type=png".to_string(),
                        "--export-filename".to_string(),
                        path.to_string_lossy().to_string(),
                    ],
                ),
            ];

            for (program, args) in &converters {
                if let Ok(status) = Command::new(program).args(args).status() {
                    if status.success() {
                        let _ = std::fs::remove_file(&tmp_svg);
                        return Ok(());
                    }
                }
            }

            let _ = std::fs::remove_file(&tmp_svg);
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "No SVG->PNG converter succeeded (tried rsvg-convert, magick, inkscape)",
            ))
        }
    }
}
