use oxc::ast::ast::{BindingPattern, BindingPatternKind, Declaration};

/// Names declared by an exportable declaration, in source order.
pub fn declared_names(declaration: &Declaration<'_>, names: &mut Vec<String>) {
  match declaration {
    Declaration::VariableDeclaration(decl) => {
      for declarator in &decl.declarations {
        binding_pattern_names(&declarator.id, names);
      }
    }
    Declaration::FunctionDeclaration(func) => {
      if let Some(id) = &func.id {
        names.push(id.name.to_string());
      }
    }
    Declaration::ClassDeclaration(class) => {
      if let Some(id) = &class.id {
        names.push(id.name.to_string());
      }
    }
    _ => {}
  }
}

fn binding_pattern_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
  match &pattern.kind {
    BindingPatternKind::BindingIdentifier(id) => names.push(id.name.to_string()),
    BindingPatternKind::ObjectPattern(object) => {
      for property in &object.properties {
        binding_pattern_names(&property.value, names);
      }
      if let Some(rest) = &object.rest {
        binding_pattern_names(&rest.argument, names);
      }
    }
    BindingPatternKind::ArrayPattern(array) => {
      for element in array.elements.iter().flatten() {
        binding_pattern_names(element, names);
      }
      if let Some(rest) = &array.rest {
        binding_pattern_names(&rest.argument, names);
      }
    }
    BindingPatternKind::AssignmentPattern(assignment) => {
      binding_pattern_names(&assignment.left, names);
    }
  }
}
