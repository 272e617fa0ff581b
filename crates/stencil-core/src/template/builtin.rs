//! The bundled default template.
//!
//! Used when the remote template cannot be fetched, or when the user opts
//! into it at the fallback prompt. Paths are template-relative; rename
//! rules are applied to the final component at copy time.

/// One file of the bundled template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    pub path: &'static str,
    pub contents: &'static str,
}

/// Every file of the default template, in copy order.
pub fn files() -> &'static [TemplateFile] {
    FILES
}

const FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "gitignore",
        contents: r#"# dependencies
node_modules/
.pnp
.pnp.js

# testing
coverage/

# production
build/

# misc
.DS_Store
.env
.env.local

npm-debug.log*
yarn-debug.log*
yarn-error.log*
"#,
    },
    TemplateFile {
        path: "env.example",
        contents: r#"# Copy to .env and fill in before starting the dev server.
REACT_APP_PROVIDER_URL=https://node.example.com/graphql
REACT_APP_WALLET_SECRET=
"#,
    },
    TemplateFile {
        path: "README-template.md",
        contents: r#"# My Dapp

This project was bootstrapped with stencil.

## Available Scripts

In the `frontend` directory, you can run:

### `yarn start`

Runs the app in development mode. Open
[http://localhost:3000](http://localhost:3000) to view it in the browser.

### `yarn build`

Builds the app for production to the `build` folder.

### `yarn test`

Launches the test runner in interactive watch mode.
"#,
    },
    TemplateFile {
        path: "frontend/tsconfig.json",
        contents: r#"{
  "compilerOptions": {
    "target": "es2019",
    "lib": ["dom", "dom.iterable", "esnext"],
    "allowJs": true,
    "skipLibCheck": true,
    "esModuleInterop": true,
    "strict": true,
    "forceConsistentCasingInFileNames": true,
    "module": "esnext",
    "moduleResolution": "node",
    "resolveJsonModule": true,
    "isolatedModules": true,
    "noEmit": true,
    "jsx": "react-jsx"
  },
  "include": ["src"]
}
"#,
    },
    TemplateFile {
        path: "frontend/public/index.html",
        contents: r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>My Dapp</title>
  </head>
  <body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="root"></div>
  </body>
</html>
"#,
    },
    TemplateFile {
        path: "frontend/src/index.tsx",
        contents: r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';

const root = ReactDOM.createRoot(
  document.getElementById('root') as HTMLElement
);
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#,
    },
    TemplateFile {
        path: "frontend/src/App.tsx",
        contents: r#"import React, { useState } from 'react';

function App() {
  const [counter, setCounter] = useState(0);

  return (
    <div>
      <p>Counter: {counter}</p>
      <button onClick={() => setCounter(counter + 1)}>Increment</button>
    </div>
  );
}

export default App;
"#,
    },
    TemplateFile {
        path: "frontend/src/App.test.tsx",
        contents: r#"import React from 'react';
import { render, screen } from '@testing-library/react';
import App from './App';

test('clicking the increment button increments the counter', () => {
  render(<App />);

  const counterText = screen.getByText(/Counter: \d+/);
  const current = Number(counterText.textContent?.match(/\d+/)?.[0]);

  screen.getByText('Increment').click();

  expect(screen.getByText(`Counter: ${current + 1}`)).toBeInTheDocument();
});
"#,
    },
    TemplateFile {
        path: "frontend/src/react-app-env.d.ts",
        contents: r#"/// <reference types="react-scripts" />
"#,
    },
];
