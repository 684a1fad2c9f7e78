// Expansion of a realistic multi-file robot description template

use spot_launch::xacro::{expand_file, expand_str};
use std::{fs, path::Path};

const NS: &str = "http://www.ros.org/wiki/xacro";

fn write_description_tree(dir: &Path) -> std::path::PathBuf {
    fs::write(
        dir.join("materials.xacro"),
        format!(
            r#"<robot xmlns:xacro="{ns}">
  <material name="spot_yellow">
    <color rgba="1.0 0.83 0.0 1.0"/>
  </material>
</robot>"#,
            ns = NS
        ),
    )
    .unwrap();

    fs::write(
        dir.join("leg.xacro"),
        format!(
            r#"<robot xmlns:xacro="{ns}">
  <xacro:property name="upper_leg_length" value="0.36"/>
  <xacro:macro name="leg" params="side mirror:=1">
    <link name="${{side}}_upper_leg">
      <visual>
        <geometry>
          <cylinder length="${{upper_leg_length}}" radius="0.02"/>
        </geometry>
        <material name="spot_yellow"/>
      </visual>
    </link>
    <joint name="${{side}}_hip" type="revolute">
      <axis xyz="0 ${{mirror}} 0"/>
    </joint>
  </xacro:macro>
</robot>"#,
            ns = NS
        ),
    )
    .unwrap();

    let main = dir.join("spot.urdf.xacro");
    fs::write(
        &main,
        format!(
            r#"<robot name="spot" xmlns:xacro="{ns}">
  <xacro:arg name="has_arm" default="false"/>
  <xacro:include filename="materials.xacro"/>
  <xacro:include filename="leg.xacro"/>
  <link name="body"/>
  <xacro:leg side="front_left"/>
  <xacro:leg side="front_right" mirror="-1"/>
  <xacro:if value="$(arg has_arm)">
    <link name="arm_link"/>
  </xacro:if>
</robot>"#,
            ns = NS
        ),
    )
    .unwrap();
    main
}

#[test]
fn test_full_tree_expansion() {
    let dir = tempfile::tempdir().unwrap();
    let main = write_description_tree(dir.path());

    let expanded = expand_file(&main).unwrap();

    // Included fragment content merged in
    assert!(expanded.contains("<material name=\"spot_yellow\">"));
    assert!(expanded.contains("rgba=\"1.0 0.83 0.0 1.0\""));
    // Macro from the included file, instantiated with both default and
    // overridden parameters
    assert!(expanded.contains("<link name=\"front_left_upper_leg\">"));
    assert!(expanded.contains("length=\"0.36\""));
    assert!(expanded.contains("<axis xyz=\"0 1 0\"/>"));
    assert!(expanded.contains("<axis xyz=\"0 -1 0\"/>"));
    // Conditional block off by default
    assert!(!expanded.contains("arm_link"));
    // No unexpanded template markup survives
    assert!(!expanded.contains("xacro"));
    assert!(!expanded.contains("${"));
    assert!(!expanded.contains("$("));
}

#[test]
fn test_output_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let main = write_description_tree(dir.path());

    let expanded = expand_file(&main).unwrap();
    let mut lines = expanded.lines();

    assert_eq!(lines.next(), Some("<?xml version=\"1.0\" ?>"));
    assert_eq!(lines.next(), Some("<robot name=\"spot\">"));
    // Two-space indentation throughout
    for line in expanded.lines().skip(2) {
        if line.starts_with(' ') {
            let leading = line.len() - line.trim_start().len();
            assert_eq!(leading % 2, 0, "odd indentation in line: {:?}", line);
        }
    }
    assert_eq!(expanded.lines().last(), Some("</robot>"));
}

#[test]
fn test_expansion_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let main = write_description_tree(dir.path());

    let first = expand_file(&main).unwrap();
    let second = expand_file(&main).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_messy_source_formatting_normalizes_the_same() {
    let dir = tempfile::tempdir().unwrap();
    let compact = expand_str(
        &format!(r#"<robot name="spot" xmlns:xacro="{}"><link name="body"/></robot>"#, NS),
        &dir.path().join("compact.urdf.xacro"),
    )
    .unwrap();
    let sprawling = expand_str(
        &format!(
            "<robot   name=\"spot\"\n    xmlns:xacro=\"{}\">\n\n\n  <link\n     name=\"body\"/>\n</robot>",
            NS
        ),
        &dir.path().join("sprawling.urdf.xacro"),
    )
    .unwrap();
    assert_eq!(compact, sprawling);
}
