//! Built-in TypeScript templates and target path patterns.
//!
//! Paths are relative to the domains root. `{{OP}}` expands to the command
//! or query operation for multi-file kinds.

use crate::domain::value_objects::ArtifactKind;

pub(super) const fn path_pattern(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Command => "{{DOMAIN_FILE}}/actions/{{DOMAIN_FILE}}.commands.ts",
        ArtifactKind::Query => "{{DOMAIN_FILE}}/actions/{{DOMAIN_FILE}}.queries.ts",
        ArtifactKind::Event => "{{DOMAIN_FILE}}/actions/{{DOMAIN_FILE}}.events.ts",
        ArtifactKind::CommandHandler => {
            "{{DOMAIN_FILE}}/handlers/handler.command.{{DOMAIN_FILE}}.{{OP}}.ts"
        }
        ArtifactKind::QueryHandler => {
            "{{DOMAIN_FILE}}/handlers/handler.query.{{DOMAIN_FILE}}.{{OP}}.ts"
        }
        ArtifactKind::EventHandler => {
            "{{DOMAIN_FILE}}/handlers/handler.event.{{DOMAIN_FILE}}.created.activity.ts"
        }
        ArtifactKind::Saga => "{{DOMAIN_FILE}}/handlers/saga.{{DOMAIN_FILE}}.processing.ts",
        ArtifactKind::HandlersIndex => "{{DOMAIN_FILE}}/handlers/index.ts",
        ArtifactKind::ExternalHandlersIndex => "{{DOMAIN_FILE}}/external.handlers/index.ts",
        ArtifactKind::DomainModule => "{{DOMAIN_FILE}}/{{DOMAIN_FILE}}.domain.module.ts",
        ArtifactKind::ParentModuleEdit => "{{PARENT_MODULE}}",
    }
}

pub(super) const ACTIONS_BARREL: &str = "{{DOMAIN_FILE}}/actions/index.ts";

pub(super) const fn body(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Command => COMMANDS,
        ArtifactKind::Query => QUERIES,
        ArtifactKind::Event => EVENTS,
        ArtifactKind::CommandHandler => COMMAND_HANDLER,
        ArtifactKind::QueryHandler => QUERY_HANDLER,
        ArtifactKind::EventHandler => EVENT_HANDLER,
        ArtifactKind::Saga => SAGA,
        ArtifactKind::HandlersIndex => HANDLERS_INDEX,
        ArtifactKind::ExternalHandlersIndex => EXTERNAL_HANDLERS_INDEX,
        ArtifactKind::DomainModule => DOMAIN_MODULE,
        ArtifactKind::ParentModuleEdit => PARENT_MODULE,
    }
}

pub(super) const fn description(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Command => "Create, update and delete command classes",
        ArtifactKind::Query => "Get-by-id and list query classes",
        ArtifactKind::Event => "Created, updated and deleted domain events",
        ArtifactKind::CommandHandler => "One handler per command operation",
        ArtifactKind::QueryHandler => "One handler per query operation",
        ArtifactKind::EventHandler => "Activity handler for the created event",
        ArtifactKind::Saga => "Processing saga triggered by the created event",
        ArtifactKind::HandlersIndex => "Handler barrel listing every domain handler",
        ArtifactKind::ExternalHandlersIndex => "Barrel for handlers of other domains' events",
        ArtifactKind::DomainModule => "Domain module registering the handler barrels",
        ArtifactKind::ParentModuleEdit => "Registration of the domain module in the parent",
    }
}

const COMMANDS: &str = r#"import { Command } from '@cqrs/core';

export const {{DOMAIN_CONSTANT}}_ENTITY_TYPE = '{{ENTITY_TYPE}}';

export class Create{{DOMAIN_PASCAL}}Command extends Command {
  readonly entityType = {{DOMAIN_CONSTANT}}_ENTITY_TYPE;

  constructor(public readonly payload: Record<string, unknown>) {
    super();
  }
}

export class Update{{DOMAIN_PASCAL}}Command extends Command {
  readonly entityType = {{DOMAIN_CONSTANT}}_ENTITY_TYPE;

  constructor(
    public readonly id: string,
    public readonly payload: Record<string, unknown>,
  ) {
    super();
  }
}

export class Delete{{DOMAIN_PASCAL}}Command extends Command {
  readonly entityType = {{DOMAIN_CONSTANT}}_ENTITY_TYPE;

  constructor(public readonly id: string) {
    super();
  }
}
"#;

const QUERIES: &str = r#"import { Query } from '@cqrs/core';

export class Get{{DOMAIN_PASCAL}}ByIdQuery extends Query {
  readonly entityType = '{{ENTITY_TYPE}}';

  constructor(public readonly id: string) {
    super();
  }
}

export class List{{DOMAIN_PLURAL_PASCAL}}Query extends Query {
  readonly entityType = '{{ENTITY_TYPE}}';

  constructor(public readonly filter: Record<string, unknown> = {}) {
    super();
  }
}
"#;

const EVENTS: &str = r#"import { DomainEvent } from '@cqrs/core';

export class {{DOMAIN_PASCAL}}CreatedEvent extends DomainEvent {
  constructor(
    public readonly id: string,
    public readonly payload: Record<string, unknown>,
  ) {
    super();
  }
}

export class {{DOMAIN_PASCAL}}UpdatedEvent extends DomainEvent {
  constructor(
    public readonly id: string,
    public readonly payload: Record<string, unknown>,
  ) {
    super();
  }
}

export class {{DOMAIN_PASCAL}}DeletedEvent extends DomainEvent {
  constructor(public readonly id: string) {
    super();
  }
}
"#;

const COMMAND_HANDLER: &str = r#"import { CommandHandler, ICommandHandler, Inject, Repository } from '@cqrs/core';
{{SECURITY_IMPORT}}{{SERVICE_IMPORTS}}import { {{COMMAND_CLASS}} } from '../actions/{{DOMAIN_FILE}}.commands';

@CommandHandler({{COMMAND_CLASS}})
{{SECURITY_DECORATOR}}export class {{HANDLER_CLASS}} implements ICommandHandler<{{COMMAND_CLASS}}> {
  constructor(
    @Inject('{{REPOSITORY_TOKEN}}') private readonly repository: Repository,
{{SERVICE_INJECTIONS}}  ) {}

  async execute(command: {{COMMAND_CLASS}}): Promise<void> {
    {{OP_BODY}}
  }
}
"#;

const QUERY_HANDLER: &str = r#"import { IQueryHandler, Inject, QueryHandler, Repository } from '@cqrs/core';
{{SECURITY_IMPORT}}{{SERVICE_IMPORTS}}import { {{QUERY_CLASS}} } from '../actions/{{DOMAIN_FILE}}.queries';

@QueryHandler({{QUERY_CLASS}})
{{SECURITY_DECORATOR}}export class {{HANDLER_CLASS}} implements IQueryHandler<{{QUERY_CLASS}}> {
  constructor(
    @Inject('{{REPOSITORY_TOKEN}}') private readonly repository: Repository,
{{SERVICE_INJECTIONS}}  ) {}

  async execute(query: {{QUERY_CLASS}}): Promise<unknown> {
    {{OP_BODY}}
  }
}
"#;

const EVENT_HANDLER: &str = r#"import { EventsHandler, IEventHandler } from '@cqrs/core';
import { {{DOMAIN_PASCAL}}CreatedEvent } from '../actions/{{DOMAIN_FILE}}.events';

@EventsHandler({{DOMAIN_PASCAL}}CreatedEvent)
export class {{DOMAIN_PASCAL}}CreatedActivityHandler
  implements IEventHandler<{{DOMAIN_PASCAL}}CreatedEvent>
{
  handle(event: {{DOMAIN_PASCAL}}CreatedEvent): void {
    console.debug('{{DOMAIN_CAMEL}} created', event.id);
  }
}
"#;

const SAGA: &str = r#"import { Saga } from '@cqrs/core';
import { {{DOMAIN_PASCAL}}CreatedEvent } from '../actions/{{DOMAIN_FILE}}.events';

@Saga({{DOMAIN_PASCAL}}CreatedEvent)
export class {{DOMAIN_PASCAL}}ProcessingSaga {
  readonly steps = [
{{SAGA_STEP_LIST}}  ];
{{SAGA_STEP_METHODS}}}
"#;

const HANDLERS_INDEX: &str = r#"{{IMPORTS}}export const {{DOMAIN_CONSTANT}}_HANDLERS = [
{{ENTRIES}}];
"#;

const EXTERNAL_HANDLERS_INDEX: &str = r#"// Handlers subscribed to events raised by other domains.
export const {{DOMAIN_CONSTANT}}_EXTERNAL_HANDLERS = [
];
"#;

const DOMAIN_MODULE: &str = r#"import { DomainModule } from '@cqrs/core';
import { {{DOMAIN_CONSTANT}}_EXTERNAL_HANDLERS } from './external.handlers';
import { {{DOMAIN_CONSTANT}}_HANDLERS } from './handlers';

@DomainModule({
  providers: [...{{DOMAIN_CONSTANT}}_HANDLERS, ...{{DOMAIN_CONSTANT}}_EXTERNAL_HANDLERS],
})
export class {{DOMAIN_PASCAL}}DomainModule {}
"#;

const PARENT_MODULE: &str = r#"import { RootModule } from '@cqrs/core';
{{IMPORTS}}@RootModule({
  imports: [
{{ENTRIES}}  ],
})
export class {{PARENT_CLASS}} {}
"#;
