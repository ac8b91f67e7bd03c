//! Chart part builder: serializes a `ChartSpec` into a DrawingML
//! `chartSpace` with literal category and value caches, so the chart
//! renders without a backing workbook.

use quick_xml::escape::escape;

use docforge_core::chart::{ChartKind, ChartSpec, SeriesSpec};

use super::package::{NS_A, NS_C, NS_R, XML_DECL};

const CAT_AX_ID: u32 = 1;
const VAL_AX_ID: u32 = 2;

pub(super) fn chart_space_xml(spec: &ChartSpec) -> String {
    let plot = match spec.kind {
        ChartKind::Bar => bar_chart_xml(spec),
        ChartKind::Pie => pie_chart_xml(spec),
        ChartKind::Line => line_chart_xml(spec),
    };
    // Pie charts carry no axes.
    let axes = match spec.kind {
        ChartKind::Pie => String::new(),
        ChartKind::Bar | ChartKind::Line => format!("{}{}", cat_ax_xml(), val_ax_xml()),
    };
    format!(
        "{XML_DECL}<c:chartSpace xmlns:c=\"{NS_C}\" xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\">\
         <c:chart>{title}\
         <c:plotArea><c:layout/>{plot}{axes}</c:plotArea>\
         <c:legend><c:legendPos val=\"r\"/><c:overlay val=\"0\"/></c:legend>\
         <c:plotVisOnly val=\"1\"/>\
         </c:chart>\
         </c:chartSpace>",
        title = title_xml(&spec.title),
    )
}

fn title_xml(title: &str) -> String {
    if title.trim().is_empty() {
        return "<c:autoTitleDeleted val=\"1\"/>".to_string();
    }
    format!(
        "<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/>\
         <a:p><a:r><a:rPr lang=\"en-US\" sz=\"1400\" b=\"1\"/><a:t>{}</a:t></a:r></a:p>\
         </c:rich></c:tx><c:overlay val=\"0\"/></c:title>\
         <c:autoTitleDeleted val=\"0\"/>",
        escape(title),
    )
}

fn bar_chart_xml(spec: &ChartSpec) -> String {
    format!(
        "<c:barChart><c:barDir val=\"col\"/><c:grouping val=\"clustered\"/>\
         <c:varyColors val=\"0\"/>{sers}\
         <c:axId val=\"{CAT_AX_ID}\"/><c:axId val=\"{VAL_AX_ID}\"/></c:barChart>",
        sers = all_sers(spec, ""),
    )
}

fn pie_chart_xml(spec: &ChartSpec) -> String {
    format!(
        "<c:pieChart><c:varyColors val=\"1\"/>{sers}<c:firstSliceAng val=\"0\"/></c:pieChart>",
        sers = all_sers(spec, ""),
    )
}

fn line_chart_xml(spec: &ChartSpec) -> String {
    format!(
        "<c:lineChart><c:grouping val=\"standard\"/><c:varyColors val=\"0\"/>{sers}\
         <c:marker val=\"1\"/>\
         <c:axId val=\"{CAT_AX_ID}\"/><c:axId val=\"{VAL_AX_ID}\"/></c:lineChart>",
        sers = all_sers(spec, "<c:smooth val=\"0\"/>"),
    )
}

fn all_sers(spec: &ChartSpec, trailing: &str) -> String {
    spec.series
        .iter()
        .enumerate()
        .map(|(i, series)| ser_xml(i, series, &spec.categories, trailing))
        .collect()
}

fn ser_xml(idx: usize, series: &SeriesSpec, categories: &[String], trailing: &str) -> String {
    format!(
        "<c:ser><c:idx val=\"{idx}\"/><c:order val=\"{idx}\"/>\
         <c:tx><c:v>{name}</c:v></c:tx>\
         <c:cat><c:strLit><c:ptCount val=\"{cat_count}\"/>{cats}</c:strLit></c:cat>\
         <c:val><c:numLit><c:ptCount val=\"{val_count}\"/>{vals}</c:numLit></c:val>\
         {trailing}</c:ser>",
        name = escape(&series.name),
        cat_count = categories.len(),
        cats = str_pts(categories),
        val_count = series.values.len(),
        vals = num_pts(&series.values),
    )
}

fn str_pts(values: &[String]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("<c:pt idx=\"{i}\"><c:v>{}</c:v></c:pt>", escape(v)))
        .collect()
}

fn num_pts(values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("<c:pt idx=\"{i}\"><c:v>{v}</c:v></c:pt>"))
        .collect()
}

fn cat_ax_xml() -> String {
    format!(
        "<c:catAx><c:axId val=\"{CAT_AX_ID}\"/>\
         <c:scaling><c:orientation val=\"minMax\"/></c:scaling>\
         <c:delete val=\"0\"/><c:axPos val=\"b\"/>\
         <c:crossAx val=\"{VAL_AX_ID}\"/></c:catAx>"
    )
}

fn val_ax_xml() -> String {
    format!(
        "<c:valAx><c:axId val=\"{VAL_AX_ID}\"/>\
         <c:scaling><c:orientation val=\"minMax\"/></c:scaling>\
         <c:delete val=\"0\"/><c:axPos val=\"l\"/>\
         <c:crossAx val=\"{CAT_AX_ID}\"/></c:valAx>"
    )
}
